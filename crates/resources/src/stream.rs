use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Fixed set of topics a resource can be filed under.
///
/// Serialized as the display name (`"Power BI"`, `"AI/ML"`).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stream {
    #[serde(rename = "Data Science")]
    DataScience,
    #[serde(rename = "Data Analytics")]
    DataAnalytics,
    #[serde(rename = "Power BI")]
    PowerBi,
    Excel,
    #[serde(rename = "SQL")]
    Sql,
    #[serde(rename = "AI/ML")]
    AiMl,
    Python,
    JavaScript,
    React,
    Other,
}

impl Stream {
    pub const ALL: [Stream; 10] = [
        Stream::DataScience,
        Stream::DataAnalytics,
        Stream::PowerBi,
        Stream::Excel,
        Stream::Sql,
        Stream::AiMl,
        Stream::Python,
        Stream::JavaScript,
        Stream::React,
        Stream::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Stream::DataScience => "Data Science",
            Stream::DataAnalytics => "Data Analytics",
            Stream::PowerBi => "Power BI",
            Stream::Excel => "Excel",
            Stream::Sql => "SQL",
            Stream::AiMl => "AI/ML",
            Stream::Python => "Python",
            Stream::JavaScript => "JavaScript",
            Stream::React => "React",
            Stream::Other => "Other",
        }
    }
}

impl fmt::Display for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStream(pub String);

impl fmt::Display for UnknownStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown stream: {}", self.0)
    }
}

impl std::error::Error for UnknownStream {}

impl FromStr for Stream {
    type Err = UnknownStream;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Stream::ALL
            .into_iter()
            .find(|stream| stream.as_str() == s)
            .ok_or_else(|| UnknownStream(s.to_string()))
    }
}
