//! Grouping key extraction from command lines and result paths

use crate::{
    error::{AppError, Result},
    models::{GroupingKey, Invocation, Protocol, TestId},
};
use regex::Regex;
use std::path::{Component, Path};
use std::sync::OnceLock;

/// Protocol selector flag of the benchmark tool
pub const PROTOCOL_FLAG: &str = "-P";
/// HTTP method flag, only meaningful with `-P doh`
pub const METHOD_FLAG: &str = "-M";

const DEFAULT_PROTOCOL: &str = "udp";
const DEFAULT_METHOD: &str = "GET";

fn test_token() -> &'static Regex {
    static TOKEN: OnceLock<Regex> = OnceLock::new();
    TOKEN.get_or_init(|| Regex::new(r"test([1-9]\d*)").expect("static regex is valid"))
}

/// Value following the first occurrence of `flag`, or `default` when absent
pub fn get_argument<'a>(args: &'a [String], flag: &str, default: &'a str) -> Result<&'a str> {
    match args.iter().position(|arg| arg == flag) {
        None => Ok(default),
        Some(index) => args
            .get(index + 1)
            .map(String::as_str)
            .ok_or_else(|| AppError::validation(format!("Flag {} is missing its value", flag))),
    }
}

/// Protocol label of an invocation: `udp`, `doh-GET`, `doh-POST`, or verbatim
pub fn get_protocol(args: &[String]) -> Result<Protocol> {
    let protocol = get_argument(args, PROTOCOL_FLAG, DEFAULT_PROTOCOL)?;
    if protocol == "doh" {
        let method = get_argument(args, METHOD_FLAG, DEFAULT_METHOD)?;
        return Ok(Protocol::from_label(&format!("doh-{}", method)));
    }
    Ok(Protocol::from_label(protocol))
}

/// Test ids whose token appears in the path components, in component order
fn test_ids_in_path(path: &Path) -> Vec<TestId> {
    path.components()
        .filter_map(|component| match component {
            Component::Normal(name) => name.to_str(),
            _ => None,
        })
        .flat_map(|name| test_token().captures_iter(name))
        .filter_map(|captures| captures.get(1)?.as_str().parse::<u8>().ok())
        .filter_map(TestId::new)
        .collect()
}

/// First predefined test id (in `test1`..`test8` order) present in `path`
///
/// Tokens are matched whole, so `test10` never counts as `test1`, and a
/// leading zero (`test01`) never names a test.
pub fn get_test(path: &Path) -> Result<TestId> {
    let found = test_ids_in_path(path);
    TestId::all()
        .find(|candidate| found.contains(candidate))
        .ok_or_else(|| {
            AppError::validation(format!(
                "No test identifier (test1..test{}) found in path {}",
                TestId::COUNT,
                path.display()
            ))
        })
}

/// First configured resolver that appears as an exact argument
pub fn get_resolver(invocation: &Invocation, resolvers: &[String]) -> Result<String> {
    resolvers
        .iter()
        .find(|resolver| invocation.contains(resolver))
        .cloned()
        .ok_or_else(|| {
            AppError::validation(format!(
                "None of the configured resolvers ({}) appear in command line '{}'",
                resolvers.join(", "),
                invocation.args.join(" ")
            ))
        })
}

/// Builds grouping keys for result files
#[derive(Debug, Clone, Default)]
pub struct KeyExtractor {
    resolvers: Vec<String>,
}

impl KeyExtractor {
    pub fn new(resolvers: Vec<String>) -> Self {
        Self { resolvers }
    }

    /// Key for a file at `path` produced by `invocation`
    pub fn extract(&self, path: &Path, invocation: &Invocation) -> Result<GroupingKey> {
        let protocol = get_protocol(&invocation.args)?;
        let test = get_test(path)?;
        let key = GroupingKey::new(protocol, test);

        if self.resolvers.is_empty() {
            Ok(key)
        } else {
            Ok(key.with_resolver(get_resolver(invocation, &self.resolvers)?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(line: &str) -> Vec<String> {
        line.split_whitespace().map(String::from).collect()
    }

    #[test]
    fn test_protocol_defaults_to_udp() {
        assert_eq!(get_protocol(&args("flame 8.8.8.8 -l 60")).unwrap(), Protocol::Udp);
        assert_eq!(get_protocol(&args("flame -P udp")).unwrap(), Protocol::Udp);
    }

    #[test]
    fn test_doh_methods() {
        assert_eq!(get_protocol(&args("flame -P doh")).unwrap(), Protocol::DohGet);
        assert_eq!(get_protocol(&args("flame -P doh -M GET")).unwrap(), Protocol::DohGet);
        assert_eq!(get_protocol(&args("flame -M POST -P doh")).unwrap(), Protocol::DohPost);
        assert_eq!(
            get_protocol(&args("flame -P doh -M PUT")).unwrap(),
            Protocol::Other("doh-PUT".to_string())
        );
    }

    #[test]
    fn test_method_ignored_without_doh() {
        assert_eq!(get_protocol(&args("flame -M POST")).unwrap(), Protocol::Udp);
        assert_eq!(get_protocol(&args("flame -P tcp")).unwrap(), Protocol::Other("tcp".to_string()));
    }

    #[test]
    fn test_flag_without_value() {
        let err = get_protocol(&args("flame -P")).unwrap_err();
        assert_eq!(err.category(), "VALIDATION");
        assert!(err.to_string().contains("-P"));

        assert!(get_protocol(&args("flame -P doh -M")).is_err());
    }

    #[test]
    fn test_get_argument_first_occurrence() {
        let argv = args("flame -P doh -P udp");
        assert_eq!(get_argument(&argv, "-P", "udp").unwrap(), "doh");
        assert_eq!(get_argument(&argv, "-Q", "none").unwrap(), "none");
    }

    #[test]
    fn test_get_test_from_path() {
        assert_eq!(get_test(Path::new("out/tests/test3/udp.json")).unwrap().number(), 3);
        assert_eq!(get_test(Path::new("out/tests/run-test7-doh.json")).unwrap().number(), 7);
    }

    #[test]
    fn test_get_test_lowest_identifier_wins() {
        let test = get_test(Path::new("out/test5/tests/test2.json")).unwrap();
        assert_eq!(test.number(), 2);
    }

    #[test]
    fn test_get_test_requires_whole_token() {
        assert!(get_test(Path::new("out/tests/test10/a.json")).is_err());
        assert!(get_test(Path::new("r/tests/test01/a.json")).is_err());
        assert!(get_test(Path::new("r/tests/test0003/a.json")).is_err());
        assert!(get_test(Path::new("out/tests/test9/a.json")).is_err());
        assert_eq!(get_test(Path::new("out/tests/test10/test4.json")).unwrap().number(), 4);
    }

    #[test]
    fn test_get_test_missing_is_descriptive() {
        let err = get_test(Path::new("out/tests/warmup.json")).unwrap_err();
        assert_eq!(err.category(), "VALIDATION");
        assert!(err.to_string().contains("out/tests/warmup.json"));
    }

    #[test]
    fn test_get_resolver() {
        let invocation = Invocation::new(args("flame 9.9.9.9 -P doh"));
        let resolvers = vec!["1.1.1.1".to_string(), "9.9.9.9".to_string()];
        assert_eq!(get_resolver(&invocation, &resolvers).unwrap(), "9.9.9.9");

        let invocation = Invocation::new(args("flame 8.8.8.8"));
        assert!(get_resolver(&invocation, &resolvers).is_err());
    }

    #[test]
    fn test_key_extractor() {
        let invocation = Invocation::new(args("flame 1.1.1.1 -P doh -M POST"));
        let path = Path::new("r/tests/test6/x.json");

        let key = KeyExtractor::default().extract(path, &invocation).unwrap();
        assert_eq!(key, GroupingKey::new(Protocol::DohPost, TestId::new(6).unwrap()));

        let key = KeyExtractor::new(vec!["1.1.1.1".to_string()]).extract(path, &invocation).unwrap();
        assert_eq!(key.resolver.as_deref(), Some("1.1.1.1"));
    }
}
