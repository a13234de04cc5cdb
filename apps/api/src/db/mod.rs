pub mod init;
pub mod retry;
