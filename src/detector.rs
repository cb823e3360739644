use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Framework label assigned to a project.
///
/// Only the labels that change extraction behavior or carry display information get their own
/// variant; every other label from the detection table is kept verbatim in [`Framework::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum Framework {
    Express,
    Fastify,
    Koa,
    NestJs,
    NextJs,
    NuxtJs,
    Generic,
    Other(String),
}

impl Framework {
    pub fn from_label(label: &str) -> Self {
        match label.to_ascii_lowercase().as_str() {
            "express" => Framework::Express,
            "fastify" => Framework::Fastify,
            "koa" => Framework::Koa,
            "nestjs" => Framework::NestJs,
            "nextjs" => Framework::NextJs,
            "nuxtjs" => Framework::NuxtJs,
            "generic" | "" => Framework::Generic,
            other => Framework::Other(other.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Framework::Express => "express",
            Framework::Fastify => "fastify",
            Framework::Koa => "koa",
            Framework::NestJs => "nestjs",
            Framework::NextJs => "nextjs",
            Framework::NuxtJs => "nuxtjs",
            Framework::Generic => "generic",
            Framework::Other(label) => label,
        }
    }
}

impl fmt::Display for Framework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Framework {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Framework::from_label(s))
    }
}

impl From<String> for Framework {
    fn from(label: String) -> Self {
        Framework::from_label(&label)
    }
}

impl From<Framework> for String {
    fn from(framework: Framework) -> Self {
        framework.label().to_string()
    }
}

/// Display information about a framework.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameworkInfo {
    pub name: &'static str,
    pub description: &'static str,
    pub patterns: &'static [&'static str],
    pub website: &'static str,
}

/// Ordered framework -> manifest package table. The first label with a declared package wins.
const FRAMEWORK_PACKAGES: &[(&str, &[&str])] = &[
    // Web frameworks
    ("express", &["express"]),
    ("fastify", &["fastify"]),
    ("koa", &["koa"]),
    ("hapi", &["hapi", "@hapi/hapi"]),
    ("restify", &["restify"]),
    ("nestjs", &["@nestjs/core", "@nestjs/common"]),
    ("adonisjs", &["@adonisjs/core", "adonis"]),
    ("sails", &["sails", "@sailsjs/core"]),
    ("loopback", &["@loopback/core", "loopback"]),
    ("keystone", &["@keystonejs/core", "keystone"]),
    ("strapi", &["@strapi/core", "strapi"]),
    // Full-stack frameworks
    ("nextjs", &["next"]),
    ("nuxtjs", &["nuxt", "@nuxt/core"]),
    ("gatsby", &["gatsby"]),
    ("remix", &["@remix-run/node", "remix"]),
    ("astro", &["astro"]),
    // Frontend frameworks
    ("react", &["react", "@react/core"]),
    ("vue", &["vue", "@vue/core"]),
    ("angular", &["@angular/core", "angular"]),
    ("svelte", &["svelte", "@svelte/core"]),
    ("solid", &["solid-js", "@solid/core"]),
    ("qwik", &["@qwik/core", "qwik"]),
    // ORMs
    ("prisma", &["@prisma/client", "prisma"]),
    ("typeorm", &["typeorm", "@typeorm/core"]),
    ("sequelize", &["sequelize"]),
    ("mongoose", &["mongoose"]),
    ("knex", &["knex"]),
    // GraphQL
    ("apollo", &["apollo-server", "@apollo/server"]),
    ("mercurius", &["mercurius", "@mercuriusjs/core"]),
    ("yoga", &["@graphql-yoga/core", "@graphql-yoga/node"]),
    // Microservices
    ("moleculer", &["moleculer", "@moleculer/core"]),
    ("seneca", &["seneca", "@seneca/core"]),
    // Real-time
    ("socketio", &["socket.io", "@socket.io/core"]),
    ("ws", &["ws"]),
    ("uws", &["uws"]),
    // CMS
    ("ghost", &["ghost", "@ghost/core"]),
    ("wordpress", &["@wordpress/core", "wordpress"]),
    ("drupal", &["@drupal/core", "drupal"]),
    // E-commerce
    ("shopify", &["@shopify/core", "shopify"]),
    ("woocommerce", &["@woocommerce/core", "woocommerce"]),
    ("magento", &["@magento/core", "magento"]),
];

const DEPENDENCY_SECTIONS: &[&str] = &[
    "dependencies",
    "devDependencies",
    "peerDependencies",
    "optionalDependencies",
];

/// Framework detector for identifying the web framework of a project.
///
/// Detection reads the project's `package.json` and looks up its declared dependencies in a
/// static table. It never fails: a missing or malformed manifest yields [`Framework::Generic`].
pub struct FrameworkDetector;

impl FrameworkDetector {
    /// Detects the framework used by the project at `project_root`.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use apidoc_from_source::detector::FrameworkDetector;
    /// use std::path::Path;
    ///
    /// let framework = FrameworkDetector::detect(Path::new("./my-api"));
    /// println!("Detected {}", framework);
    /// ```
    pub fn detect(project_root: &Path) -> Framework {
        let manifest_path = project_root.join("package.json");
        if !manifest_path.exists() {
            debug!("No package.json in {}", project_root.display());
            return Framework::Generic;
        }

        let manifest = match fs::read_to_string(&manifest_path)
            .map_err(|e| e.to_string())
            .and_then(|text| serde_json::from_str::<Value>(&text).map_err(|e| e.to_string()))
        {
            Ok(manifest) => manifest,
            Err(e) => {
                warn!("Could not read package.json: {}", e);
                return Framework::Generic;
            }
        };

        let framework = Self::detect_from_manifest(&manifest);
        debug!("Detected framework: {}", framework);
        framework
    }

    /// Classify an already-parsed manifest.
    pub fn detect_from_manifest(manifest: &Value) -> Framework {
        let dependencies = Self::merged_dependencies(manifest);

        for (label, packages) in FRAMEWORK_PACKAGES {
            if packages.iter().any(|package| dependencies.contains_key(*package)) {
                return Framework::from_label(label);
            }
        }

        Self::detect_custom_framework(manifest)
    }

    fn merged_dependencies(manifest: &Value) -> Map<String, Value> {
        let mut merged = Map::new();
        for section in DEPENDENCY_SECTIONS {
            if let Some(deps) = manifest.get(*section).and_then(Value::as_object) {
                for (name, version) in deps {
                    merged.insert(name.clone(), version.clone());
                }
            }
        }
        merged
    }

    /// Fallback classification from scripts and project metadata.
    fn detect_custom_framework(manifest: &Value) -> Framework {
        if let Some(scripts) = manifest.get("scripts").and_then(Value::as_object) {
            let joined = scripts
                .values()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join(" ");
            if ["start", "dev", "serve"].iter().any(|word| joined.contains(word)) {
                return Framework::Other("custom-server".to_string());
            }
        }

        let text_field = |key: &str| manifest.get(key).and_then(Value::as_str).unwrap_or("");
        let project_info = format!("{} {}", text_field("name"), text_field("description")).to_lowercase();

        if project_info.contains("api") || project_info.contains("server") {
            return Framework::Other("api-server".to_string());
        }
        if project_info.contains("microservice") || project_info.contains("micro") {
            return Framework::Other("microservice".to_string());
        }
        if project_info.contains("fullstack") || project_info.contains("full-stack") {
            return Framework::Other("fullstack".to_string());
        }

        Framework::Generic
    }
}

/// Display information for a framework; unknown frameworks get the generic entry.
pub fn framework_info(framework: &Framework) -> FrameworkInfo {
    match framework {
        Framework::Express => FrameworkInfo {
            name: "Express.js",
            description: "Fast, unopinionated, minimalist web framework",
            patterns: &["app.get()", "router.get()", "app.use()"],
            website: "https://expressjs.com",
        },
        Framework::Fastify => FrameworkInfo {
            name: "Fastify",
            description: "Fast and low overhead web framework",
            patterns: &["fastify.get()", "fastify.post()", "fastify.route()"],
            website: "https://fastify.io",
        },
        Framework::Koa => FrameworkInfo {
            name: "Koa.js",
            description: "Next generation web framework",
            patterns: &["app.use()", "app.get()", "app.post()"],
            website: "https://koajs.com",
        },
        Framework::NestJs => FrameworkInfo {
            name: "NestJS",
            description: "Progressive Node.js framework",
            patterns: &["@Get()", "@Post()", "@Controller()"],
            website: "https://nestjs.com",
        },
        Framework::NextJs => FrameworkInfo {
            name: "Next.js",
            description: "React framework for production",
            patterns: &["pages/api/", "app/api/", "getServerSideProps"],
            website: "https://nextjs.org",
        },
        Framework::NuxtJs => FrameworkInfo {
            name: "Nuxt.js",
            description: "Vue.js framework for production",
            patterns: &["pages/api/", "server/api/", "serverMiddleware"],
            website: "https://nuxtjs.org",
        },
        Framework::Generic | Framework::Other(_) => FrameworkInfo {
            name: "Generic Node.js",
            description: "Custom Node.js application",
            patterns: &["http.createServer()", "custom routing"],
            website: "https://nodejs.org",
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn project_with_manifest(manifest: &str) -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("package.json"), manifest).unwrap();
        temp_dir
    }

    #[test]
    fn test_detect_nestjs() {
        let dir = project_with_manifest(r#"{"dependencies": {"@nestjs/core": "^10.0.0", "rxjs": "^7"}}"#);
        assert_eq!(FrameworkDetector::detect(dir.path()), Framework::NestJs);
    }

    #[test]
    fn test_detect_from_dev_and_peer_dependencies() {
        let manifest = json!({"devDependencies": {"fastify": "4"}});
        assert_eq!(FrameworkDetector::detect_from_manifest(&manifest), Framework::Fastify);

        let manifest = json!({"peerDependencies": {"@hapi/hapi": "21"}});
        assert_eq!(
            FrameworkDetector::detect_from_manifest(&manifest),
            Framework::Other("hapi".to_string())
        );
    }

    #[test]
    fn test_table_order_decides() {
        // express precedes nestjs in the table
        let manifest = json!({"dependencies": {"@nestjs/common": "10", "express": "4"}});
        assert_eq!(FrameworkDetector::detect_from_manifest(&manifest), Framework::Express);
    }

    #[test]
    fn test_missing_manifest_is_generic() {
        let temp_dir = TempDir::new().unwrap();
        assert_eq!(FrameworkDetector::detect(temp_dir.path()), Framework::Generic);
    }

    #[test]
    fn test_malformed_manifest_is_generic() {
        let dir = project_with_manifest("{ not json");
        assert_eq!(FrameworkDetector::detect(dir.path()), Framework::Generic);
    }

    #[test]
    fn test_custom_fallbacks() {
        let scripts = json!({"scripts": {"run": "node dev-server.js"}});
        assert_eq!(
            FrameworkDetector::detect_from_manifest(&scripts),
            Framework::Other("custom-server".to_string())
        );

        let api = json!({"name": "billing-api"});
        assert_eq!(
            FrameworkDetector::detect_from_manifest(&api),
            Framework::Other("api-server".to_string())
        );

        let micro = json!({"description": "A microservice"});
        assert_eq!(
            FrameworkDetector::detect_from_manifest(&micro),
            Framework::Other("microservice".to_string())
        );

        let full = json!({"name": "my-fullstack-app"});
        assert_eq!(
            FrameworkDetector::detect_from_manifest(&full),
            Framework::Other("fullstack".to_string())
        );

        assert_eq!(FrameworkDetector::detect_from_manifest(&json!({})), Framework::Generic);
    }

    #[test]
    fn test_label_round_trip() {
        for label in ["express", "nestjs", "nextjs", "generic", "sails"] {
            assert_eq!(Framework::from_label(label).label(), label);
        }
        assert_eq!(Framework::from_label("NestJS"), Framework::NestJs);
    }

    #[test]
    fn test_framework_info() {
        assert_eq!(framework_info(&Framework::NestJs).name, "NestJS");
        assert_eq!(
            framework_info(&Framework::Other("sails".to_string())).name,
            "Generic Node.js"
        );
    }

    #[test]
    fn test_framework_serializes_as_label() {
        let value = serde_json::to_value(Framework::NestJs).unwrap();
        assert_eq!(value, json!("nestjs"));
    }
}
