#[derive(Debug)]
pub enum ModhunterError {
    InvalidInput(String),
    MalformedBundle {
        line: usize,
        source: serde_json::Error,
    },
    Io(std::io::Error),
    Json(serde_json::Error),
    Csv(csv::Error),
    Regex(regex::Error),
}

impl std::fmt::Display for ModhunterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput(msg) => write!(f, "invalid input: {}", msg),
            Self::MalformedBundle { line, source } => {
                write!(f, "malformed evidence record at line {}: {}", line, source)
            }
            Self::Io(e) => write!(f, "io error: {}", e),
            Self::Json(e) => write!(f, "json error: {}", e),
            Self::Csv(e) => write!(f, "csv error: {}", e),
            Self::Regex(e) => write!(f, "regex error: {}", e),
        }
    }
}

impl std::error::Error for ModhunterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidInput(_) => None,
            Self::MalformedBundle { source, .. } => Some(source),
            Self::Io(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::Csv(e) => Some(e),
            Self::Regex(e) => Some(e),
        }
    }
}

pub type Result<T> = std::result::Result<T, ModhunterError>;

impl From<std::io::Error> for ModhunterError {
    fn from(x: std::io::Error) -> Self {
        Self::Io(x)
    }
}

impl From<serde_json::Error> for ModhunterError {
    fn from(x: serde_json::Error) -> Self {
        Self::Json(x)
    }
}

impl From<csv::Error> for ModhunterError {
    fn from(x: csv::Error) -> Self {
        Self::Csv(x)
    }
}

impl From<regex::Error> for ModhunterError {
    fn from(x: regex::Error) -> Self {
        Self::Regex(x)
    }
}
