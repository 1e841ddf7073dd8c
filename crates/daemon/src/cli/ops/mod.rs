pub mod daemon;
pub mod health;
pub mod init;
pub mod keygen;
pub mod read;
pub mod write;

pub use daemon::Daemon;
pub use health::Health;
pub use init::Init;
pub use keygen::Keygen;
pub use read::Read;
pub use write::Write;
