//! Message transports between the duel server and its clients.

use crate::protocol::Message;

/// A bidirectional, ordered channel of [`Message`]s.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    async fn send(&mut self, msg: Message) -> anyhow::Result<()>;
    async fn recv(&mut self) -> anyhow::Result<Message>;
}

#[async_trait::async_trait]
impl<T: Transport + ?Sized> Transport for Box<T> {
    async fn send(&mut self, msg: Message) -> anyhow::Result<()> {
        (**self).send(msg).await
    }

    async fn recv(&mut self) -> anyhow::Result<Message> {
        (**self).recv().await
    }
}

pub mod in_memory;
pub mod tcp;

pub use in_memory::InMemoryTransport;
pub use tcp::TcpTransport;
