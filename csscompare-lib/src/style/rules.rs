use crate::style::selector_sort::sort_selectors;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// One step of the normalization pipeline.
///
/// Rules are plain data: the engine in [`crate::style::normalize`] walks a
/// slice of them in order and feeds each one the output of the previous one.
pub enum Rule {
    /// Exact substring replacement. `first_only` replaces only the first
    /// occurrence, otherwise every occurrence is replaced.
    Literal {
        description: &'static str,
        find: &'static str,
        replace: &'static str,
        first_only: bool,
    },
    /// Regex replacement with a `$1`/`${1}` style template.
    Pattern {
        description: &'static str,
        pattern: Regex,
        template: &'static str,
    },
    /// Regex replacement whose output is computed from the captures.
    Computed {
        description: &'static str,
        pattern: Regex,
        compute: fn(&Captures<'_>) -> String,
    },
    /// Structural rewrite that needs more than a single match to decide.
    Scan {
        description: &'static str,
        scan: fn(&str) -> String,
    },
}

impl Rule {
    pub fn literal(description: &'static str, find: &'static str, replace: &'static str) -> Self {
        Rule::Literal {
            description,
            find,
            replace,
            first_only: false,
        }
    }

    pub fn pattern(description: &'static str, pattern: &str, template: &'static str) -> Self {
        Rule::Pattern {
            description,
            pattern: compile(pattern),
            template,
        }
    }

    pub fn computed(
        description: &'static str,
        pattern: &str,
        compute: fn(&Captures<'_>) -> String,
    ) -> Self {
        Rule::Computed {
            description,
            pattern: compile(pattern),
            compute,
        }
    }

    pub fn scan(description: &'static str, scan: fn(&str) -> String) -> Self {
        Rule::Scan { description, scan }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Rule::Literal { description, .. }
            | Rule::Pattern { description, .. }
            | Rule::Computed { description, .. }
            | Rule::Scan { description, .. } => *description,
        }
    }

    /// Apply this rule to `text`, returning the rewritten copy.
    /// A rule that matches nothing returns the text unchanged.
    pub fn apply(&self, text: &str) -> String {
        match self {
            Rule::Literal {
                find,
                replace,
                first_only: true,
                ..
            } => text.replacen(*find, replace, 1),
            Rule::Literal { find, replace, .. } => text.replace(*find, replace),
            Rule::Pattern {
                pattern, template, ..
            } => pattern.replace_all(text, *template).into_owned(),
            Rule::Computed {
                pattern, compute, ..
            } => pattern
                .replace_all(text, |caps: &Captures<'_>| compute(caps))
                .into_owned(),
            Rule::Scan { scan, .. } => scan(text),
        }
    }
}

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("normalization rule regex should compile")
}

static SASS_COMPARISON_RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
    vec![
        Rule::pattern("collapse blank lines", r"\n+", "\n"),
        Rule::pattern(
            "add leading zeroes",
            r"([^A-Za-z0-9_])\.([0-9])",
            "${1}0.${2}",
        ),
        Rule::scan(
            "strip prefixed declarations followed by the unprefixed one",
            strip_prefixed_duplicates,
        ),
        Rule::pattern(
            "strip MS flexbox properties",
            r"(?m)^ *-ms-flex-.*\n|^ *display: -ms-(inline-)?flexbox.*\n",
            "",
        ),
        Rule::pattern(
            "strip prefixed WebKit transform/sticky",
            r"(?m)^.*? -webkit-(?:transform|sticky).*;\n",
            "",
        ),
        Rule::pattern(
            "strip WebKit box, placeholder and keyframes artifacts",
            r"(?m)^ *-webkit-box-.*\n|^.*?:-(webkit|moz|ms)-.*?placeholder[^}]+\}\n|^@-webkit-keyframes[\s\S]+?\n\}\n",
            "",
        ),
        Rule::pattern(
            "simplify prefixed @supports queries",
            r"(?m)^@supports \(\(.*?\) or \((.*?)\)\) \{",
            "@supports (${1}) {",
        ),
        Rule::pattern("strip sourcemap comments", r"/\*#.*\n?", ""),
        Rule::literal("fix color #19692c", "#19692c", "#19692b"),
        Rule::literal("fix color #ba8b00", "#ba8b00", "#b98b00"),
        Rule::literal("fix color #ececf6", "#ececf6", "#ececf5"),
        Rule::literal("fix color #040505", "#040505", "#040405"),
        Rule::computed(
            "extend repeating decimals",
            r"([0-9]+)\.([0-9]{5})([0-9]%)",
            extend_repeating_decimal,
        ),
        Rule::literal("fix 42.857143%", "42.857143%", "42.85714286%"),
        Rule::Literal {
            description: "fix WebKit tap highlight color",
            find: "-webkit-tap-highlight-color: rgba(0, 0, 0, 0);",
            replace: "-webkit-tap-highlight-color: transparent;",
            first_only: true,
        },
        Rule::scan("sort multi-line selectors", sort_selectors),
    ]
});

/// The ordered rule table that reshapes Sass output for diffing against Less
/// output. Order matters: later anchors assume earlier rewrites.
pub fn sass_comparison_rules() -> &'static [Rule] {
    &SASS_COMPARISON_RULES
}

const VENDOR_PREFIXES: [&str; 3] = ["webkit-", "moz-", "ms-"];

/// Body of a vendor-prefixed declaration line, i.e. `prop: value;\n` out of
/// `  -webkit-prop: value;\n`. `line` must include its trailing newline.
fn prefixed_body(line: &str) -> Option<&str> {
    let rest = line.trim_start_matches(' ').strip_prefix('-')?;
    let body = VENDOR_PREFIXES
        .iter()
        .find_map(|prefix| rest.strip_prefix(prefix))?;
    let declaration = body.strip_suffix(";\n")?;
    declaration.contains(": ").then_some(body)
}

/// Remove runs of vendor-prefixed declaration lines that are immediately
/// followed by the unprefixed form of the last line in the run.
///
/// Only the last prefixed line has to match the unprefixed one; any prefixed
/// lines before it in the same run go with it. When the whole run doesn't
/// match, shorter runs are tried before giving up on the line.
pub fn strip_prefixed_duplicates(text: &str) -> String {
    let lines: Vec<&str> = text.split_inclusive('\n').collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;

    while i < lines.len() {
        let bodies: Vec<&str> = lines[i..].iter().map_while(|l| prefixed_body(l)).collect();

        let run = (1..=bodies.len()).rev().find(|&len| {
            lines
                .get(i + len)
                .is_some_and(|next| next.trim_start_matches(' ') == bodies[len - 1])
        });

        match run {
            Some(len) => i += len,
            None => {
                out.push_str(lines[i]);
                i += 1;
            }
        }
    }

    out
}

/// `16.666667%` -> `16.66666667%`: five copies of one digit followed by a
/// final digit get padded out to eight fractional digits.
fn extend_repeating_decimal(caps: &Captures<'_>) -> String {
    let run = &caps[2];
    let digit = run.as_bytes()[0];
    if !run.bytes().all(|b| b == digit) {
        return caps[0].to_string();
    }
    let repeated = (digit as char).to_string().repeat(7);
    format!("{}.{}{}", &caps[1], repeated, &caps[3])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(description: &str) -> &'static Rule {
        sass_comparison_rules()
            .iter()
            .find(|r| r.description() == description)
            .unwrap()
    }

    #[test]
    fn test_rule_table_order() {
        let rules = sass_comparison_rules();
        assert_eq!(rules.len(), 16);
        assert_eq!(rules[0].description(), "collapse blank lines");
        assert_eq!(rules[15].description(), "sort multi-line selectors");
    }

    #[test]
    fn test_prefixed_body() {
        assert_eq!(
            prefixed_body("  -webkit-flex: 1;\n"),
            Some("flex: 1;\n")
        );
        assert_eq!(prefixed_body("-ms-grid-row: 1;\n"), Some("grid-row: 1;\n"));
        assert_eq!(prefixed_body("  -o-flex: 1;\n"), None);
        assert_eq!(prefixed_body("  -webkit-flex: 1;"), None);
        assert_eq!(prefixed_body("  -webkit-flex:1;\n"), None);
        assert_eq!(prefixed_body("\t-webkit-flex: 1;\n"), None);
    }

    #[test]
    fn test_strip_single_prefixed_line() {
        let css = ".a {\n  -webkit-flex: 1;\n  flex: 1;\n}\n";
        assert_eq!(strip_prefixed_duplicates(css), ".a {\n  flex: 1;\n}\n");
    }

    #[test]
    fn test_strip_multiple_prefixed_lines() {
        let css = "  -webkit-user-select: none;\n  -moz-user-select: none;\n  -ms-user-select: none;\n  user-select: none;\n";
        assert_eq!(strip_prefixed_duplicates(css), "  user-select: none;\n");
    }

    #[test]
    fn test_keep_prefixed_line_with_different_value() {
        let css = "  -webkit-appearance: button;\n  appearance: none;\n";
        assert_eq!(strip_prefixed_duplicates(css), css);
    }

    #[test]
    fn test_keep_prefixed_line_without_unprefixed_twin() {
        let css = "  -webkit-text-size-adjust: 100%;\n  color: red;\n";
        assert_eq!(strip_prefixed_duplicates(css), css);
    }

    #[test]
    fn test_unprefixed_twin_may_use_other_indent() {
        let css = "  -moz-tab-size: 4;\ntab-size: 4;\n";
        assert_eq!(strip_prefixed_duplicates(css), "tab-size: 4;\n");
    }

    #[test]
    fn test_unprefixed_twin_must_end_with_newline() {
        let css = "-webkit-flex: 1;\nflex: 1;";
        assert_eq!(strip_prefixed_duplicates(css), css);
    }

    #[test]
    fn test_leading_zero() {
        let r = rule("add leading zeroes");
        assert_eq!(r.apply("color:.5;"), "color:0.5;");
        assert_eq!(r.apply("opacity: .65;"), "opacity: 0.65;");
        assert_eq!(r.apply("color:1.5;"), "color:1.5;");
        assert_eq!(r.apply("a.5"), "a.5");
        assert_eq!(r.apply(".5"), ".5");
    }

    #[test]
    fn test_ms_flexbox_lines() {
        let r = rule("strip MS flexbox properties");
        let css = "  display: -ms-flexbox;\n  display: -ms-inline-flexbox;\n  -ms-flex-wrap: wrap;\n  display: flex;\n";
        assert_eq!(r.apply(css), "  display: flex;\n");
    }

    #[test]
    fn test_webkit_transform_and_sticky() {
        let r = rule("strip prefixed WebKit transform/sticky");
        let css = "  position: -webkit-sticky;\n  transition: -webkit-transform 0.3s ease-out;\n  position: sticky;\n";
        assert_eq!(r.apply(css), "  position: sticky;\n");
    }

    #[test]
    fn test_webkit_box_placeholder_keyframes() {
        let r = rule("strip WebKit box, placeholder and keyframes artifacts");
        let css = concat!(
            "  -webkit-box-flex: 1;\n",
            ".form-control::-webkit-input-placeholder {\n  color: #6c757d;\n  opacity: 1;\n}\n",
            ".form-control::-moz-placeholder {\n  color: #6c757d;\n}\n",
            "@-webkit-keyframes spin {\n  to {\n    transform: rotate(360deg);\n  }\n}\n",
            "@keyframes spin {\n  to {\n    transform: rotate(360deg);\n  }\n}\n",
        );
        assert_eq!(
            r.apply(css),
            "@keyframes spin {\n  to {\n    transform: rotate(360deg);\n  }\n}\n"
        );
    }

    #[test]
    fn test_supports_query() {
        let r = rule("simplify prefixed @supports queries");
        assert_eq!(
            r.apply("@supports ((position: -webkit-sticky) or (position: sticky)) {\n"),
            "@supports (position: sticky) {\n"
        );
        assert_eq!(
            r.apply("@supports (display: grid) {\n"),
            "@supports (display: grid) {\n"
        );
    }

    #[test]
    fn test_sourcemap_comment() {
        let r = rule("strip sourcemap comments");
        assert_eq!(
            r.apply("a {\n}\n/*# sourceMappingURL=bootstrap.css.map */\n"),
            "a {\n}\n"
        );
        assert_eq!(r.apply("/*# sourceMappingURL=x.map */"), "");
    }

    #[test]
    fn test_repeating_decimal() {
        let r = rule("extend repeating decimals");
        assert_eq!(r.apply("width: 16.666667%;"), "width: 16.66666667%;");
        assert_eq!(r.apply("width: 33.333333%;"), "width: 33.33333333%;");
        assert_eq!(r.apply("width: 8.333333%;"), "width: 8.33333333%;");
        assert_eq!(r.apply("width: 42.857143%;"), "width: 42.857143%;");
        assert_eq!(r.apply("width: 33.3333%;"), "width: 33.3333%;");
        assert_eq!(r.apply("width: 33.33333333%;"), "width: 33.33333333%;");
    }

    #[test]
    fn test_tap_highlight_first_occurrence_only() {
        let r = rule("fix WebKit tap highlight color");
        let decl = "-webkit-tap-highlight-color: rgba(0, 0, 0, 0);";
        let css = format!("{decl}\n{decl}\n");
        assert_eq!(
            r.apply(&css),
            format!("-webkit-tap-highlight-color: transparent;\n{decl}\n")
        );
    }
}
