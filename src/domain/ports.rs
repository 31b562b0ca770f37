use async_trait::async_trait;

// Port for the document-store connection lifecycle. The server opens the
// connection once before accepting requests and closes it once on the way
// out; tests substitute a recording fake to verify both transitions.
#[async_trait]
pub trait DatabaseLifecycle: Send + Sync {
    async fn connect(&mut self) -> Result<(), String>;
    async fn close(&mut self) -> Result<(), String>;
}
