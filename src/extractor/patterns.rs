//! Recognition patterns for HTTP-method call sites, grouped by framework dialect.
//!
//! Every pattern captures the verb in group 1 and the quoted path in group 2. The table is
//! ordered and deliberately overlapping: `router.get('/x')` is recognized both as an Express
//! router call and as a Koa router call. Overlaps are collapsed by deduplication, not here.

use once_cell::sync::Lazy;
use regex::Regex;

/// Framework dialect a pattern belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    Express,
    Fastify,
    Koa,
    NestJs,
}

impl Dialect {
    pub fn label(&self) -> &'static str {
        match self {
            Dialect::Express => "express",
            Dialect::Fastify => "fastify",
            Dialect::Koa => "koa",
            Dialect::NestJs => "nestjs",
        }
    }
}

/// One row of the pattern table.
pub struct RoutePattern {
    pub dialect: Dialect,
    /// Human-readable shape of the call, for diagnostics
    pub shape: &'static str,
    pub regex: Regex,
}

fn pattern(dialect: Dialect, shape: &'static str, source: &str) -> RoutePattern {
    RoutePattern {
        dialect,
        shape,
        // Patterns are compile-time constants; a failure here is a programming error.
        regex: Regex::new(source).unwrap(),
    }
}

static PATTERN_TABLE: Lazy<Vec<RoutePattern>> = Lazy::new(|| {
    vec![
        pattern(
            Dialect::Express,
            "app.<verb>('<path>')",
            r#"app\.(get|post|put|delete|patch)\(['"`]([^'"`]+)['"`]"#,
        ),
        pattern(
            Dialect::Express,
            "router.<verb>('<path>')",
            r#"router\.(get|post|put|delete|patch)\(['"`]([^'"`]+)['"`]"#,
        ),
        pattern(
            Dialect::Fastify,
            "fastify.<verb>('<path>')",
            r#"fastify\.(get|post|put|delete|patch)\(['"`]([^'"`]+)['"`]"#,
        ),
        pattern(
            Dialect::Koa,
            "router.<verb>('<path>')",
            r#"router\.(get|post|put|delete|patch)\(['"`]([^'"`]+)['"`]"#,
        ),
        pattern(
            Dialect::NestJs,
            "@<Verb>('<path>')",
            r#"@(Get|Post|Put|Delete|Patch)\(['"`]([^'"`]+)['"`]\)"#,
        ),
    ]
});

/// The full ordered pattern table.
pub fn pattern_table() -> &'static [RoutePattern] {
    &PATTERN_TABLE
}
