pub mod filesystem;
pub mod http;
pub mod output;

pub use filesystem::{FileSystem, RealFileSystem};
pub use http::{HttpClient, ReqwestClient};
pub use output::{Output, TerminalOutput};

#[cfg(test)]
pub use filesystem::MockFileSystem;
#[cfg(test)]
pub use http::MockHttpClient;
#[cfg(test)]
pub use output::{MockOutput, OutputMessage};
