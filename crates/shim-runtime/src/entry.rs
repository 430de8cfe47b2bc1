//! Exported entry points
//!
//! The host calls exported functions with no arguments and no context, so
//! the dispatcher has to live in a static. Every method exported through
//! [`canister_update!`](crate::canister_update) or
//! [`canister_query!`](crate::canister_query) lands in [`run`] and shares
//! the one instance below.

use shim_primitives::{InstanceError, SingleInstance};

use crate::config::RuntimeConfig;
use crate::dispatcher::{Dispatcher, Program};
use crate::host::{Host, Ic0Host};

static INSTANCE: SingleInstance<Dispatcher<Ic0Host>> = SingleInstance::new();

/// Serve one host call with the process-wide dispatcher.
///
/// `config` is only looked at on the very first call.
pub fn run<P: Program + ?Sized>(program: &mut P, config: RuntimeConfig) {
    if let Err(err) = run_on(&INSTANCE, || Ic0Host, program, config) {
        let mut host = Ic0Host;
        crate::shim_debug!(host, "entry refused: {:?}", err);
        host.trap();
    }
}

/// Serve one call with the dispatcher held in `instance`, creating it with
/// `make_host` on first use.
///
/// Fails without running anything if the instance is already borrowed
/// (a reentrant call) or its creation was interrupted.
pub fn run_on<H, P>(
    instance: &SingleInstance<Dispatcher<H>>,
    make_host: impl FnOnce() -> H,
    program: &mut P,
    config: RuntimeConfig,
) -> Result<(), InstanceError>
where
    H: Host,
    P: Program + ?Sized,
{
    instance.with(
        || Dispatcher::with_config(make_host(), config),
        |dispatcher| dispatcher.run(program),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatcher::CallContext;
    use crate::error::RuntimeError;
    use crate::testing::{envelope, MockHost};
    use shim_blob::{ByteSink, ByteSource};

    fn config() -> RuntimeConfig {
        RuntimeConfig::DEFAULT
            .with_operating_pages(1)
            .with_data_blob_len(0)
            .with_save_blob_len(16)
    }

    type Shared = SingleInstance<Dispatcher<MockHost>>;

    fn with_dispatcher<R>(instance: &Shared, f: impl FnOnce(&mut Dispatcher<MockHost>) -> R) -> R {
        instance
            .with(|| Dispatcher::with_config(MockHost::new(), config()), f)
            .unwrap()
    }

    fn send(instance: &Shared, payload: &[u8]) {
        with_dispatcher(instance, |d| d.host_mut().set_request(&envelope(payload)));
    }

    fn last_payload(instance: &Shared) -> std::vec::Vec<u8> {
        with_dispatcher(instance, |d| d.host().last_payload().unwrap().to_vec())
    }

    fn store(ctx: &mut CallContext<'_>) -> Result<(), RuntimeError> {
        let word = ctx.request().read_to_end();
        ctx.open_save().put_line(word)?;
        ctx.put_line(b"stored")
    }

    fn recall(ctx: &mut CallContext<'_>) -> Result<(), RuntimeError> {
        let mut line = [0u8; 17];
        let n = ctx.open_save().read_line(&mut line, 16)?;
        ctx.output().write_exact(&line[..n])?;
        Ok(())
    }

    #[test]
    fn test_exports_share_one_dispatcher() {
        static SHARED: Shared = SingleInstance::new();

        send(&SHARED, b"plugh");
        run_on(&SHARED, MockHost::new, &mut store, config()).unwrap();
        assert_eq!(last_payload(&SHARED), b"stored\n");

        send(&SHARED, b"");
        run_on(&SHARED, MockHost::new, &mut recall, config()).unwrap();
        assert_eq!(last_payload(&SHARED), b"plugh\n");

        let grows = with_dispatcher(&SHARED, |d| d.host().grow_calls());
        assert_eq!(grows, 1);
    }

    #[test]
    fn test_reentrant_call_refused() {
        static NESTED: Shared = SingleInstance::new();

        send(&NESTED, b"");
        let mut inner = None;
        run_on(
            &NESTED,
            MockHost::new,
            &mut |_: &mut CallContext<'_>| -> Result<(), RuntimeError> {
                inner = Some(run_on(&NESTED, MockHost::new, &mut recall, config()));
                Ok(())
            },
            config(),
        )
        .unwrap();

        assert_eq!(inner, Some(Err(InstanceError::Busy)));
    }

    #[test]
    fn test_first_config_wins() {
        static FIRST: Shared = SingleInstance::new();

        // An empty argument is a degenerate call, so no request is needed
        run_on(&FIRST, MockHost::new, &mut recall, config().with_save_blob_len(8)).unwrap();
        run_on(&FIRST, MockHost::new, &mut recall, RuntimeConfig::DEFAULT).unwrap();

        let save_len = with_dispatcher(&FIRST, |d| d.save().map(|s| s.len()));
        assert_eq!(save_len, Some(8));
    }
}
