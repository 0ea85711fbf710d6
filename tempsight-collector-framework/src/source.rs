//! Source adapter abstraction.

use tempsight_common::Point;

use crate::error::Result;

/// A telemetry source polled by a [`CollectorLoop`](crate::CollectorLoop).
///
/// The loop calls [`open`](Self::open) once before the first cycle, passes
/// the session by reference to every [`fetch`](Self::fetch), and hands it
/// back to [`close`](Self::close) exactly once when the loop ends, whatever
/// the reason. Sources without a long-lived session use `()`.
#[allow(async_fn_in_trait)]
pub trait Source {
    /// Long-lived connection state owned by the loop.
    type Session;

    /// Name used in log lines.
    fn name(&self) -> &str;

    /// Establish the session. Failure aborts the collector before any cycle runs.
    async fn open(&self) -> Result<Self::Session>;

    /// Fetch one batch of points.
    ///
    /// Any failure discards the whole batch; there is no partial result.
    async fn fetch(&self, session: &Self::Session) -> Result<Vec<Point>>;

    /// Release the session.
    async fn close(&self, session: Self::Session) -> Result<()>;
}
