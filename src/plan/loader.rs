//! Plan acquisition from files, stdin and URLs

use std::fmt;
use std::io::Read;
use std::path::PathBuf;
use std::str::FromStr;
use url::Url;

use super::error::{PlanError, PlanResult};
use super::model::Plan;
use crate::traits::{FileSystem, HttpClient};

/// Where a plan document comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanSource {
    File(PathBuf),
    Stdin,
    Url(Url),
}

impl PlanSource {
    /// Parse `-`, an `http(s)://` URL, a `file://` URL or a plain path
    pub fn parse(source: &str) -> PlanResult<Self> {
        let source = source.trim();

        if source.is_empty() {
            return Err(PlanError::InvalidSource("empty plan source".to_string()));
        }

        if source == "-" {
            return Ok(PlanSource::Stdin);
        }

        // Windows drive letters parse as one-letter URL schemes, so only
        // known schemes are treated as URLs
        match Url::parse(source) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(PlanSource::Url(url)),
            Ok(url) if url.scheme() == "file" => url
                .to_file_path()
                .map(PlanSource::File)
                .map_err(|_| PlanError::InvalidSource(source.to_string())),
            _ => Ok(PlanSource::File(PathBuf::from(source))),
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, PlanSource::Url(_))
    }
}

impl FromStr for PlanSource {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PlanSource::parse(s)
    }
}

impl fmt::Display for PlanSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanSource::File(path) => write!(f, "{}", path.display()),
            PlanSource::Stdin => write!(f, "<stdin>"),
            PlanSource::Url(url) => write!(f, "{}", url),
        }
    }
}

/// Reads and parses plans through the injected filesystem and HTTP client
pub struct PlanLoader<'a> {
    fs: &'a dyn FileSystem,
    http: &'a dyn HttpClient,
}

impl<'a> PlanLoader<'a> {
    pub fn new(fs: &'a dyn FileSystem, http: &'a dyn HttpClient) -> Self {
        Self { fs, http }
    }

    /// Load and parse a plan in one step
    pub fn load(&self, source: &PlanSource) -> PlanResult<Plan> {
        let content = self.read(source)?;
        let plan = Plan::from_json(&content)?;

        tracing::debug!(
            source = %source,
            format_version = %plan.format_version,
            resource_changes = plan.resource_changes.len(),
            "Loaded plan"
        );

        Ok(plan)
    }

    /// Fetch the raw document text
    pub fn read(&self, source: &PlanSource) -> PlanResult<String> {
        tracing::debug!(source = %source, "Reading plan");

        match source {
            PlanSource::File(path) => {
                self.fs
                    .read_to_string(path)
                    .map_err(|err| PlanError::Read {
                        path: path.display().to_string(),
                        message: format!("{:#}", err),
                    })
            }
            PlanSource::Stdin => {
                let mut content = String::new();
                std::io::stdin().read_to_string(&mut content)?;
                Ok(content)
            }
            PlanSource::Url(url) => self.http.get(url.as_str()).map_err(|err| PlanError::Fetch {
                url: url.to_string(),
                message: format!("{:#}", err),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::{MockFileSystem, MockHttpClient};

    const PLAN: &str = r#"{
        "format_version": "1.2",
        "resource_changes": [
            {"address": "aws_instance.web", "type": "aws_instance", "change": {"actions": ["create"]}}
        ]
    }"#;

    #[test]
    fn test_parse_sources() {
        assert_eq!(PlanSource::parse("-").unwrap(), PlanSource::Stdin);
        assert_eq!(
            PlanSource::parse("plans/tfplan.json").unwrap(),
            PlanSource::File(PathBuf::from("plans/tfplan.json"))
        );
        assert!(
            PlanSource::parse("https://example.com/plan.json")
                .unwrap()
                .is_remote()
        );
        assert!(matches!(
            PlanSource::parse("C:\\plans\\tfplan.json").unwrap(),
            PlanSource::File(_)
        ));
        assert!(matches!(
            PlanSource::parse("  "),
            Err(PlanError::InvalidSource(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let fs = MockFileSystem::new().with_file("/tmp/plan.json", PLAN);
        let http = MockHttpClient::new();
        let loader = PlanLoader::new(&fs, &http);

        let plan = loader
            .load(&PlanSource::File(PathBuf::from("/tmp/plan.json")))
            .unwrap();
        assert_eq!(plan.resource_changes.len(), 1);
        assert!(http.requests().is_empty());
    }

    #[test]
    fn test_load_from_url() {
        let fs = MockFileSystem::new();
        let http = MockHttpClient::new().with_response("https://example.com/plan.json", PLAN);
        let loader = PlanLoader::new(&fs, &http);

        let source = PlanSource::parse("https://example.com/plan.json").unwrap();
        let plan = loader.load(&source).unwrap();
        assert_eq!(plan.format_version, "1.2");
        assert_eq!(http.requests(), vec!["https://example.com/plan.json".to_string()]);
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let fs = MockFileSystem::new();
        let http = MockHttpClient::new();
        let loader = PlanLoader::new(&fs, &http);

        let err = loader
            .load(&PlanSource::File(PathBuf::from("/nope.json")))
            .unwrap_err();
        assert!(matches!(err, PlanError::Read { .. }));
    }

    #[test]
    fn test_failed_fetch_is_fetch_error() {
        let fs = MockFileSystem::new();
        let http = MockHttpClient::new();
        let loader = PlanLoader::new(&fs, &http);

        let source = PlanSource::parse("https://example.com/missing.json").unwrap();
        let err = loader.load(&source).unwrap_err();
        assert!(matches!(err, PlanError::Fetch { .. }));
        assert!(err.to_string().contains("404"));
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        let fs = MockFileSystem::new().with_file("/tmp/bad.json", "not json");
        let http = MockHttpClient::new();
        let loader = PlanLoader::new(&fs, &http);

        let err = loader
            .load(&PlanSource::File(PathBuf::from("/tmp/bad.json")))
            .unwrap_err();
        assert!(matches!(err, PlanError::Parse(_)));
    }
}
