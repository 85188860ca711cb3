use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::UnknownMethod;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = UnknownMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "DELETE" => Ok(HttpMethod::Delete),
            _ => Err(UnknownMethod(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("get".parse::<HttpMethod>().unwrap(), HttpMethod::Get);
        assert_eq!("Delete".parse::<HttpMethod>().unwrap(), HttpMethod::Delete);
        assert_eq!(
            "PATCH".parse::<HttpMethod>(),
            Err(UnknownMethod("PATCH".to_string()))
        );
    }

    #[test]
    fn test_serde_uses_wire_names() {
        let json = serde_json::to_string(&HttpMethod::Put).unwrap();
        assert_eq!(json, "\"PUT\"");
        let method: HttpMethod = serde_json::from_str("\"POST\"").unwrap();
        assert_eq!(method, HttpMethod::Post);
    }
}
