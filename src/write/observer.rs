/// Receives every stream written by the geometry encoder, for diagnostics.
///
/// The observer carries the name of the layer being written: callers set it with
/// [`StreamObserver::set_layer_name`] before encoding the columns of a layer.
pub trait StreamObserver {
    /// Whether the encoder should report streams at all
    fn is_active(&self) -> bool;

    /// Sets the layer of the streams observed from now on.
    fn set_layer_name(&mut self, _layer_name: &str) {}

    /// Called once per stream with its name, the values it encodes and its wire bytes.
    fn observe_stream(&mut self, name: &str, values: &[i32], metadata: &[u8], payload: &[u8]);
}

/// A [`StreamObserver`] that observes nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl StreamObserver for NoopObserver {
    fn is_active(&self) -> bool {
        false
    }

    fn observe_stream(&mut self, _: &str, _: &[i32], _: &[u8], _: &[u8]) {}
}
