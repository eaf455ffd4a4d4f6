use crate::adapter::Adapter;
use crate::handler::Handler;

/// Applies `adapters` to `handler` in source code order.
///
/// The first adapter becomes the outermost wrapper: it runs first when the
/// returned handler is invoked and regains control last. With no adapters the
/// handler is returned unchanged.
///
/// ```ignore
/// let h = adapt(
///     hello,                    // the last handler to run
///     [
///         trace.boxed(),        // runs first
///         set_header.boxed(),   // runs second
///     ],
/// );
/// ```
pub fn adapt<H, I>(handler: H, adapters: I) -> Box<dyn Handler>
where
    H: Handler + 'static,
    I: IntoIterator,
    I::IntoIter: DoubleEndedIterator,
    I::Item: Adapter,
{
    adapters
        .into_iter()
        .rev()
        .fold(handler.boxed(), |next, a| a.adapt(next))
}
