//! Resource and function tokens, and SDK version helpers.
//!
//! Tokens have the form `package:module:member`. The standard layout puts
//! each member in its own module file named after the member with a
//! lowercase first letter, e.g. `random:index/randomString:RandomString`.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::InfoError;

const NAME_PATTERN: &str = "[A-Za-z_.][A-Za-z0-9_.-]*";

static NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!("^{}$", NAME_PATTERN)).expect("name pattern is a valid regex")
});

static QNAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!("^(?:{0}/)*{0}$", NAME_PATTERN)).expect("qname pattern is a valid regex")
});

/// True for a simple token name such as `RandomString`.
pub fn is_name(s: &str) -> bool {
    NAME.is_match(s)
}

/// True for a `/`-separated qualified name such as `index/randomString`.
pub fn is_qname(s: &str) -> bool {
    QNAME.is_match(s)
}

/// `pkg:mod:mem`, with no validation.
pub fn make_member(pkg: &str, module: &str, member: &str) -> String {
    format!("{}:{}:{}", pkg, module, member)
}

/// `pkg:mod:typ`, with no validation.
pub fn make_type(pkg: &str, module: &str, ty: &str) -> String {
    make_member(pkg, module, ty)
}

/// Standard resource token: `(aws, s3, Bucket)` gives `aws:s3/bucket:Bucket`.
pub fn make_resource(pkg: &str, module: &str, resource: &str) -> Result<String, InfoError> {
    if !is_name(resource) {
        return Err(InfoError::InvalidName {
            kind: "resource",
            name: resource.to_string(),
        });
    }
    let module = make_module(pkg, module, resource)?;
    Ok(format!("{}:{}", module, resource))
}

/// Standard function token: `(aws, s3, getBucket)` gives `aws:s3/getBucket:getBucket`.
pub fn make_data_source(pkg: &str, module: &str, name: &str) -> Result<String, InfoError> {
    if !is_name(name) {
        return Err(InfoError::InvalidName {
            kind: "data source",
            name: name.to_string(),
        });
    }
    let module = make_module(pkg, module, name)?;
    Ok(format!("{}:{}", module, name))
}

/// `pkg:mod/member`, with the member's first letter lowercased.
fn make_module(pkg: &str, module: &str, member: &str) -> Result<String, InfoError> {
    if !is_qname(pkg) {
        return Err(InfoError::InvalidName {
            kind: "package",
            name: pkg.to_string(),
        });
    }
    let module = format!("{}/{}", module, lower_first(member));
    if !is_qname(&module) {
        return Err(InfoError::InvalidName {
            kind: "module",
            name: module,
        });
    }
    Ok(format!("{}:{}", pkg, module))
}

fn lower_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(c) => c.to_lowercase().chain(chars).collect(),
    }
}

/// Parse a version leniently: a leading `v` is ignored and missing minor or
/// patch components default to zero.
pub fn parse_version(version: &str) -> Result<semver::Version, InfoError> {
    let trimmed = version.trim();
    let trimmed = trimmed.strip_prefix('v').unwrap_or(trimmed);

    // Pad the numeric core to three components, keeping any suffix.
    let split = trimmed.find(['-', '+']).unwrap_or(trimmed.len());
    let (core, suffix) = trimmed.split_at(split);
    let mut core = core.to_string();
    for _ in core.split('.').count()..3 {
        core.push_str(".0");
    }

    semver::Version::parse(&format!("{}{}", core, suffix)).map_err(|source| {
        InfoError::InvalidVersion {
            version: version.to_string(),
            source,
        }
    })
}

/// Major version suffix of an SDK module path: empty for v0 and v1, `vN`
/// from v2 on.
pub fn module_major_version(version: &str) -> Result<String, InfoError> {
    let version = parse_version(version)?;
    if version.major > 1 {
        Ok(format!("v{}", version.major))
    } else {
        Ok(String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_make_member() {
        assert_eq!(make_member("aws", "s3", "Bucket"), "aws:s3:Bucket");
        assert_eq!(make_type("aws", "s3", "BucketArgs"), "aws:s3:BucketArgs");
    }

    #[test]
    fn test_make_resource() {
        assert_eq!(
            make_resource("random", "index", "RandomString").unwrap(),
            "random:index/randomString:RandomString"
        );
        assert_eq!(make_resource("aws", "s3", "Bucket").unwrap(), "aws:s3/bucket:Bucket");
    }

    #[test]
    fn test_make_data_source() {
        assert_eq!(
            make_data_source("aws", "s3", "getBucket").unwrap(),
            "aws:s3/getBucket:getBucket"
        );
    }

    #[test]
    fn test_invalid_names() {
        let err = make_resource("aws", "s3", "my bucket").unwrap_err();
        assert_eq!(err.to_string(), r#"invalid resource name "my bucket""#);
        assert!(make_resource("aws", "s3", "").is_err());
        assert!(make_data_source("a:b", "s3", "getBucket").is_err());
        assert!(make_resource("aws", "", "Bucket").is_err());
    }

    #[test]
    fn test_parse_version() {
        assert_eq!(parse_version("v4.2.0").unwrap(), semver::Version::new(4, 2, 0));
        assert_eq!(parse_version("5").unwrap(), semver::Version::new(5, 0, 0));
        assert_eq!(parse_version("1.2").unwrap(), semver::Version::new(1, 2, 0));
        assert_eq!(parse_version("2.0.0-alpha.1").unwrap().pre.as_str(), "alpha.1");
        assert!(parse_version("latest").is_err());
    }

    #[test]
    fn test_module_major_version() {
        assert_eq!(module_major_version("0.1.0").unwrap(), "");
        assert_eq!(module_major_version("1.9.3").unwrap(), "");
        assert_eq!(module_major_version("v2.0.0").unwrap(), "v2");
        assert_eq!(module_major_version("6.12.1").unwrap(), "v6");
        assert!(module_major_version("").is_err());
    }
}
