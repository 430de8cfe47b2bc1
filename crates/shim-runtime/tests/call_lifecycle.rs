//! Call Lifecycle Integration Tests
//!
//! Drive whole calls through a dispatcher backed by `MockHost`, checking the
//! bytes that reach the host.

use shim_runtime::blob::{Blob, ByteSink, ByteSource};
use shim_runtime::testing::{envelope, minimal_envelope, MockHost};
use shim_runtime::{CallContext, Dispatcher, DispatcherState, ErrorKind, Program, RuntimeConfig, RuntimeError};

fn reverse(ctx: &mut CallContext<'_>) -> Result<(), RuntimeError> {
    let text = ctx.request().read_to_end();
    for &byte in text.iter().rev() {
        ctx.put_char(byte)?;
    }
    Ok(())
}

/// Test the canonical round trip: "abc" in, "cba" out.
#[test]
fn test_reverse_abc() {
    let mut dispatcher = Dispatcher::new(MockHost::new());
    dispatcher.host_mut().set_request(b"DIDL\x00\x01\x71\x83\x00abc");
    dispatcher.dispatch(&mut reverse).unwrap();

    assert_eq!(
        dispatcher.host().last_reply().unwrap(),
        b"DIDL\x00\x01\x71\x83\x80\x80\x80\x00cba"
    );
}

/// Test that the one-byte length form is accepted too.
#[test]
fn test_minimal_length_form() {
    let mut dispatcher = Dispatcher::new(MockHost::new());
    dispatcher.host_mut().set_request(b"DIDL\x00\x01\x71\x03abc");
    dispatcher.dispatch(&mut reverse).unwrap();

    assert_eq!(dispatcher.host().last_payload().unwrap(), b"cba");
}

/// Test payloads whose length needs more than one LEB128 group.
#[test]
fn test_long_payload() {
    let text: Vec<u8> = (0..1500u32).map(|i| b'a' + (i % 26) as u8).collect();
    let expected: Vec<u8> = text.iter().rev().copied().collect();

    for request in [envelope(&text), minimal_envelope(&text)] {
        let mut dispatcher = Dispatcher::new(MockHost::new());
        dispatcher.host_mut().set_request(&request);
        dispatcher.dispatch(&mut reverse).unwrap();

        let reply = dispatcher.host().last_reply().unwrap();
        assert_eq!(&reply[7..12], &[0xDC, 0x8B, 0x80, 0x80, 0x00]);
        assert_eq!(dispatcher.host().last_payload().unwrap(), &expected[..]);
    }
}

/// Test that a zero-length argument neither faults nor skips the reply.
#[test]
fn test_zero_length_incoming() {
    let mut dispatcher = Dispatcher::new(MockHost::new());
    dispatcher
        .dispatch(&mut |ctx: &mut CallContext<'_>| -> Result<(), RuntimeError> {
            assert!(ctx.request().is_exhausted());
            let mut line = [0xFFu8; 4];
            assert_eq!(ctx.gets(&mut line)?, 0);
            assert_eq!(line[0], 0);
            Ok(())
        })
        .unwrap();

    assert_eq!(
        dispatcher.host().last_reply().unwrap(),
        b"DIDL\x00\x01\x71\x80\x80\x80\x80\x00"
    );
}

/// Test that malformed envelopes fail the call without a reply.
#[test]
fn test_malformed_envelopes() {
    let cases: [(&[u8], ErrorKind); 4] = [
        (b"DIDX\x00\x01\x71\x03abc", ErrorKind::MalformedEnvelope),
        (b"DIDL\x00\x01\x7d\x03abc", ErrorKind::MalformedEnvelope),
        (b"DIDL\x00\x01\x71\x09abc", ErrorKind::TruncatedEnvelope),
        (b"DIDL\x00\x01\x71\x80\x80", ErrorKind::TruncatedEnvelope),
    ];

    for (request, kind) in cases {
        let mut dispatcher = Dispatcher::new(MockHost::new());
        dispatcher.host_mut().set_request(request);
        let err = dispatcher.dispatch(&mut reverse).unwrap_err();
        assert_eq!(err.kind(), kind, "request {:02x?}", request);
        assert!(dispatcher.host().replies().is_empty());
    }
}

/// Test that an oversized argument is refused before it is copied.
#[test]
fn test_incoming_larger_than_staging() {
    let mut dispatcher = Dispatcher::new(MockHost::new());
    dispatcher.host_mut().set_request(&envelope(&[b'x'; 2048]));

    let err = dispatcher.dispatch(&mut reverse).unwrap_err();
    assert_eq!(
        err,
        RuntimeError::IncomingTooLarge {
            size: 2060,
            capacity: 2048
        }
    );
}

/// A tiny stateful game: the turn counter lives in the save blob, the room
/// descriptions in the data blob.
struct Cave;

impl Cave {
    const ROOMS: &'static [u8] = b"You are in a cave.\nYou are by a lake.\nYou are lost.\n";
}

impl Program for Cave {
    fn on_init(&mut self, data: &mut Blob<'static>, _save: &mut Blob<'static>) -> Result<(), RuntimeError> {
        data.write_exact(Self::ROOMS)?;
        Ok(())
    }

    fn call(&mut self, ctx: &mut CallContext<'_>) -> Result<(), RuntimeError> {
        let mut command = [0u8; 32];
        let n = ctx.request().read_line(&mut command, 31)?;
        if &command[..n] == b"quit" {
            return ctx.exit(0);
        }

        let mut turn = [0u8; 1];
        ctx.open_save().read_exact(&mut turn)?;
        let turn = turn[0];

        let data = ctx.open_data();
        let mut line = [0u8; 32];
        let mut len = 0;
        for _ in 0..=turn.min(2) {
            len = data.read_line(&mut line, 31)?;
        }

        ctx.output().write_exact(&line[..len])?;
        ctx.open_save().write_exact(&[turn + 1])?;
        Ok(())
    }
}

/// Test that the save blob carries state across calls.
#[test]
fn test_save_blob_persists_across_calls() {
    let mut cave = Cave;
    let mut dispatcher = Dispatcher::new(MockHost::new());

    let mut seen = Vec::new();
    for _ in 0..3 {
        dispatcher.host_mut().set_request(&envelope(b"go"));
        dispatcher.dispatch(&mut cave).unwrap();
        seen.push(dispatcher.host().last_payload().unwrap().to_vec());
    }

    assert_eq!(
        seen,
        [
            b"You are in a cave.\n".to_vec(),
            b"You are by a lake.\n".to_vec(),
            b"You are lost.\n".to_vec(),
        ]
    );
    assert_eq!(dispatcher.save().unwrap().as_bytes()[0], 3);
    assert_eq!(dispatcher.host().grow_calls(), 1);
}

/// Test that `exit` ends the call with a trap and no reply.
#[test]
#[should_panic(expected = "trap: [shim] exit(0)")]
fn test_exit_traps() {
    let mut dispatcher = Dispatcher::new(MockHost::new());
    dispatcher.host_mut().set_request(&envelope(b"quit"));
    dispatcher.run(&mut Cave);
}

/// Test that a failed first call leaves the dispatcher uninitialized.
#[test]
fn test_memory_too_small() {
    let config = RuntimeConfig::DEFAULT.with_operating_pages(1);
    let mut dispatcher = Dispatcher::with_config(MockHost::new(), config);
    let err = dispatcher.dispatch(&mut reverse).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::CapacityExceeded);
    assert_eq!(dispatcher.state(), DispatcherState::Uninitialized);
}
