//! Tests for Job lifecycle
//!
//! These tests verify:
//! - Mutating calls on unreserved jobs send nothing
//! - Priority fallback through stats-job
//! - Delete and kick tolerate jobs that are already gone

mod common;

use beanwire::protocol::Status;
use beanwire::{BeanError, Decoder, Job, DEFAULT_PRIORITY};
use common::{connection, connection_with, framed};

fn reserved(id: u64) -> Job {
    Job::new(id, &b"payload"[..], true)
}

fn peeked(id: u64) -> Job {
    Job::new(id, &b"payload"[..], false)
}

// =============================================================================
// Delete Tests
// =============================================================================

#[test]
fn test_delete_reserved_job() {
    let (mut conn, wire) = connection(b"DELETED\r\n");
    let mut job = reserved(3);

    job.delete(&mut conn).unwrap();
    assert!(!job.is_reserved());
    assert_eq!(wire.sent(), b"delete 3\r\n");
}

#[test]
fn test_delete_peeked_job_still_delegates() {
    let (mut conn, wire) = connection(b"DELETED\r\n");
    let mut job = peeked(4);

    job.delete(&mut conn).unwrap();
    assert_eq!(wire.sent(), b"delete 4\r\n");
}

#[test]
fn test_delete_twice_is_harmless() {
    let (mut conn, wire) = connection(b"DELETED\r\nNOT_FOUND\r\n");
    let mut job = reserved(5);

    job.delete(&mut conn).unwrap();
    job.delete(&mut conn).unwrap();
    assert_eq!(wire.sent(), b"delete 5\r\ndelete 5\r\n");
}

#[test]
fn test_delete_propagates_unexpected() {
    let (mut conn, _) = connection(b"INTERNAL_ERROR\r\n");
    let mut job = reserved(5);

    let err = job.delete(&mut conn).unwrap_err();
    assert!(matches!(err, BeanError::UnexpectedResponse { .. }));
}

#[test]
fn test_mutations_after_delete_are_inert() {
    let (mut conn, wire) = connection(b"DELETED\r\nNOT_FOUND\r\n");
    let mut job = reserved(6);

    job.delete(&mut conn).unwrap();
    job.release(&mut conn, Some(1), 0).unwrap();
    job.bury(&mut conn, None).unwrap();
    job.touch(&mut conn).unwrap();
    job.kick(&mut conn).unwrap();

    assert_eq!(wire.sent(), b"delete 6\r\nkick-job 6\r\n");
}

// =============================================================================
// Release / Bury Tests
// =============================================================================

#[test]
fn test_release_with_priority() {
    let (mut conn, wire) = connection(b"RELEASED\r\n");
    let mut job = reserved(7);

    job.release(&mut conn, Some(10), 30).unwrap();
    assert!(!job.is_reserved());
    assert_eq!(wire.sent(), b"release 7 10 30\r\n");
}

#[test]
fn test_release_not_reserved_is_noop() {
    let (mut conn, wire) = connection(b"");
    let mut job = peeked(7);

    job.release(&mut conn, None, 0).unwrap();
    job.bury(&mut conn, Some(1)).unwrap();
    job.touch(&mut conn).unwrap();
    assert!(wire.sent().is_empty());
}

#[test]
fn test_release_without_priority_falls_back_to_default_when_raw() {
    let stats = b"---\npri: 55\n";
    let mut replies = framed(&format!("OK {}", stats.len()), stats);
    replies.extend_from_slice(b"RELEASED\r\n");
    let (mut conn, wire) = connection(&replies);
    let mut job = reserved(8);

    job.release(&mut conn, None, 0).unwrap();
    assert_eq!(
        wire.sent_str(),
        format!("stats-job 8\r\nrelease 8 {} 0\r\n", DEFAULT_PRIORITY)
    );
}

#[cfg(feature = "yaml")]
#[test]
fn test_release_without_priority_keeps_current_priority() {
    let stats = b"---\nid: 8\npri: 55\n";
    let mut replies = framed(&format!("OK {}", stats.len()), stats);
    replies.extend_from_slice(b"RELEASED\r\n");
    let (mut conn, wire) = connection_with(&replies, Decoder::Yaml);
    let mut job = reserved(8);

    job.release(&mut conn, None, 0).unwrap();
    assert_eq!(wire.sent(), b"stats-job 8\r\nrelease 8 55 0\r\n");
}

#[cfg(feature = "yaml")]
#[test]
fn test_bury_without_priority_keeps_current_priority() {
    let stats = b"---\npri: 0\n";
    let mut replies = framed(&format!("OK {}", stats.len()), stats);
    replies.extend_from_slice(b"BURIED\r\n");
    let (mut conn, wire) = connection_with(&replies, Decoder::Yaml);
    let mut job = reserved(9);

    job.bury(&mut conn, None).unwrap();
    assert!(!job.is_reserved());
    assert_eq!(wire.sent(), b"stats-job 9\r\nbury 9 0\r\n");
}

#[test]
fn test_bury_with_priority() {
    let (mut conn, wire) = connection(b"BURIED\r\n");
    let mut job = reserved(9);

    job.bury(&mut conn, Some(0)).unwrap();
    assert_eq!(wire.sent(), b"bury 9 0\r\n");
}

#[test]
fn test_release_not_found_keeps_reservation_flag() {
    let (mut conn, _) = connection(b"NOT_FOUND\r\n");
    let mut job = reserved(10);

    let err = job.release(&mut conn, Some(1), 0).unwrap_err();
    assert_eq!(err.failed_status(), Some(Status::NotFound));
    assert!(job.is_reserved());
}

// =============================================================================
// Touch / Kick / Stats Tests
// =============================================================================

#[test]
fn test_touch_keeps_reservation() {
    let (mut conn, wire) = connection(b"TOUCHED\r\n");
    let mut job = reserved(11);

    job.touch(&mut conn).unwrap();
    assert!(job.is_reserved());
    assert_eq!(wire.sent(), b"touch 11\r\n");
}

#[test]
fn test_kick_delegates_regardless_of_reservation() {
    let (mut conn, wire) = connection(b"KICKED\r\nKICKED\r\n");
    reserved(12).kick(&mut conn).unwrap();
    peeked(13).kick(&mut conn).unwrap();
    assert_eq!(wire.sent(), b"kick-job 12\r\nkick-job 13\r\n");
}

#[test]
fn test_stats_for_job() {
    let body = b"---\nid: 14\n";
    let (mut conn, wire) = connection(&framed(&format!("OK {}", body.len()), body));

    let doc = peeked(14).stats(&mut conn).unwrap();
    assert_eq!(doc.as_raw(), Some(&body[..]));
    assert_eq!(wire.sent(), b"stats-job 14\r\n");
}

#[test]
fn test_job_accessors() {
    let job = Job::new(15, b"abc".to_vec(), true);
    assert_eq!(job.id(), 15);
    assert_eq!(&job.body()[..], b"abc");
    assert_eq!(&job.into_body()[..], b"abc");
}
