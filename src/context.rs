use crate::config::Config;
use crate::traits::{
    FileSystem, HttpClient, Output, RealFileSystem, ReqwestClient, TerminalOutput,
};
#[cfg(test)]
use crate::traits::{MockFileSystem, MockHttpClient, MockOutput};
use std::sync::Arc;

/// Application context that holds all dependencies for dependency injection
pub struct Context {
    pub fs: Arc<dyn FileSystem>,
    pub output: Arc<dyn Output>,
    pub http: Arc<dyn HttpClient>,
    pub config: Config,
}

impl Context {
    /// Create a new context with real implementations (for production use)
    pub fn new(config: Config) -> Self {
        Self {
            fs: Arc::new(RealFileSystem),
            output: Arc::new(TerminalOutput),
            http: Arc::new(ReqwestClient::new(config.http.timeout())),
            config,
        }
    }

    /// Create a new context with mock implementations (for testing)
    #[cfg(test)]
    #[allow(dead_code)]
    pub fn test() -> Self {
        Self {
            fs: Arc::new(MockFileSystem::new()),
            output: Arc::new(MockOutput::new()),
            http: Arc::new(MockHttpClient::new()),
            config: Config::default(),
        }
    }

    /// Create a test context with specific mock implementations
    #[cfg(test)]
    pub fn test_with(
        fs: Arc<dyn FileSystem>,
        output: Arc<dyn Output>,
        http: Arc<dyn HttpClient>,
    ) -> Self {
        Self {
            fs,
            output,
            http,
            config: Config::default(),
        }
    }
}

impl Clone for Context {
    fn clone(&self) -> Self {
        Self {
            fs: Arc::clone(&self.fs),
            output: Arc::clone(&self.output),
            http: Arc::clone(&self.http),
            config: self.config.clone(),
        }
    }
}
