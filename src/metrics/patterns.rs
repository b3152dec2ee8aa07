//! Shared regex pattern sets for the metric scorers
//!
//! All scanning is plain text over the upstream-supplied module source;
//! none of these patterns require a parse tree. Compiled once via
//! `OnceLock` and reused across modules.

use regex::Regex;
use std::sync::OnceLock;

fn build(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(p).expect("valid regex"))
        .collect()
}

/// Idioms that correlate with maintainable code: inheritance, tests,
/// docstrings, accessor decorators, a main guard, logging, error handling.
pub fn good_patterns() -> &'static [Regex] {
    static SET: OnceLock<Vec<Regex>> = OnceLock::new();
    SET.get_or_init(|| {
        build(&[
            r"class\s+\w+\([A-Z]\w*\):",
            r"def\s+test_\w+\(",
            r#"(?s)""".*?""""#,
            r"@property",
            r"@staticmethod|@classmethod",
            r#"if\s+__name__\s*==\s*["']__main__["']:"#,
            r"logging\.",
            r"(?s)try:.*?except.*?:",
        ])
    })
}

/// Anti-idioms: globals, dynamic evaluation, wildcard imports, TODO
/// markers, bare prints, empty statements.
pub fn bad_patterns() -> &'static [Regex] {
    static SET: OnceLock<Vec<Regex>> = OnceLock::new();
    SET.get_or_init(|| {
        build(&[
            r"global\s+\w+",
            r"exec\s*\(",
            r"eval\s*\(",
            r"import\s*\*",
            r"#\s*TODO|#\s*FIXME|#\s*HACK",
            r"print\s*\(",
            r"(?m)pass\s*$",
        ])
    })
}

/// Named design-pattern signatures counted by the design_patterns scorer.
pub fn design_patterns() -> &'static [(&'static str, Regex)] {
    static SET: OnceLock<Vec<(&'static str, Regex)>> = OnceLock::new();
    SET.get_or_init(|| {
        [
            ("Factory", r"class\s+\w*Factory\w*:"),
            ("Singleton", r"class\s+\w*Singleton\w*:|def\s+__new__\s*\("),
            ("Observer", r"class\s+\w*Observer\w*:|def\s+notify\s*\("),
            ("Strategy", r"class\s+\w*Strategy\w*:"),
            ("Builder", r"class\s+\w*Builder\w*:"),
            ("Context Manager", r"def\s+__enter__\s*\(|def\s+__exit__\s*\("),
            (
                "Decorator",
                r"@\w+|def\s+\w+\s*\([^)]*\)\s*:.*?def\s+wrapper",
            ),
        ]
        .into_iter()
        .map(|(name, p)| (name, Regex::new(p).expect("valid regex")))
        .collect()
    })
}

macro_rules! cached_regex {
    ($name:ident, $pattern:expr) => {
        pub fn $name() -> &'static Regex {
            static RE: OnceLock<Regex> = OnceLock::new();
            RE.get_or_init(|| Regex::new($pattern).expect("valid regex"))
        }
    };
}

// Declarations
cached_regex!(function_decl, r"def\s+\w+\s*\(");
cached_regex!(class_decl, r"class\s+\w+\s*[\(:]");
cached_regex!(function_start, r"^\s*def\s+");
cached_regex!(toplevel_start, r"^[a-zA-Z]");

// Documentation
cached_regex!(docstring_block, r#"(?s)""".*?""""#);
cached_regex!(inline_comment, r"#[^#]");

// Testability
cached_regex!(test_function, r"def\s+test_\w+\s*\(");
cached_regex!(assert_stmt, r"assert\s+");
cached_regex!(mock_usage, r"mock\.|Mock\(|patch\(");
cached_regex!(main_guard, r#"if\s+__name__\s*==\s*["']__main__["']:"#);
cached_regex!(parameterized_ctor, r"def\s+__init__\s*\([^)]*\w+[^)]*\)");

// Design patterns / OOP
cached_regex!(inheritance, r"class\s+\w+\s*\([^)]+\):");
cached_regex!(property_decorator, r"@property");
cached_regex!(abstract_marker, r"@abstractmethod|@abc\.abstractmethod");

// Naming conventions
cached_regex!(snake_case_function, r"def\s+[a-z_][a-z0-9_]*\s*\(");
cached_regex!(pascal_case_class, r"class\s+[A-Z][a-zA-Z0-9]*\s*[\(:]");

// Security anti-patterns
cached_regex!(eval_call, r"eval\s*\(");
cached_regex!(exec_call, r"exec\s*\(");
cached_regex!(
    shell_injection,
    r"os\.system\s*\(|subprocess\.call\s*\([^)]*shell\s*=\s*True"
);
cached_regex!(
    hardcoded_secret,
    r#"(?i)password\s*=\s*["'][^"']+["']|api_key\s*=\s*["'][^"']+["']"#
);
cached_regex!(
    sql_concat,
    r"execute\s*\([^)]*%[sf]|cursor\.execute\s*\([^)]*\+"
);

// Security good practices
cached_regex!(input_validation, r"isinstance\s*\(|hasattr\s*\(|assert\s+");
cached_regex!(exception_handling, r"try\s*:|except\s+\w+:");
cached_regex!(logging_call, r"logging\.|logger\.");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_sets_compile() {
        assert_eq!(good_patterns().len(), 8);
        assert_eq!(bad_patterns().len(), 7);
        assert_eq!(design_patterns().len(), 7);
    }

    #[test]
    fn test_main_guard_matches_both_quote_styles() {
        assert!(main_guard().is_match("if __name__ == \"__main__\":"));
        assert!(main_guard().is_match("if __name__ == '__main__':"));
    }

    #[test]
    fn test_docstring_block_spans_lines() {
        let text = "def f():\n    \"\"\"Multi\n    line.\"\"\"\n    pass\n";
        assert!(docstring_block().is_match(text));
    }

    #[test]
    fn test_hardcoded_secret_case_insensitive() {
        assert!(hardcoded_secret().is_match("PASSWORD = \"hunter2\""));
        assert!(hardcoded_secret().is_match("api_key = 'sk-123'"));
        assert!(!hardcoded_secret().is_match("password = os.environ['PW']"));
    }

    #[test]
    fn test_shell_injection_variants() {
        assert!(shell_injection().is_match("os.system(cmd)"));
        assert!(shell_injection().is_match("subprocess.call(cmd, shell=True)"));
        assert!(!shell_injection().is_match("subprocess.run(args)"));
    }
}
