//! Rendering generated TypeScript into the target language

use async_trait::async_trait;
use cdk_import_common::config::DEFAULT_SRCMAK_PROGRAM;
use cdk_import_common::{ImportConfig, ImportError, Result};
use cdk_import_generator::naming::{kebab_case, snake_case};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tokio::fs;
use tokio::process::Command;
use tracing::{debug, info, warn};

#[cfg(test)]
use mockall::automock;

use crate::import::INDEX_FILE;

pub const SUPPORTED_LANGUAGES: &[&str] = &["typescript", "python", "java", "csharp", "golang"];

/// Output language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    TypeScript,
    Python,
    Java,
    CSharp,
    Golang,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::TypeScript => "typescript",
            Language::Python => "python",
            Language::Java => "java",
            Language::CSharp => "csharp",
            Language::Golang => "golang",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Language {
    type Err = ImportError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "typescript" => Ok(Language::TypeScript),
            "python" => Ok(Language::Python),
            "java" => Ok(Language::Java),
            "csharp" => Ok(Language::CSharp),
            "golang" => Ok(Language::Golang),
            other => Err(ImportError::Config(format!(
                "Unsupported language {}. Supported: {}",
                other,
                SUPPORTED_LANGUAGES.join(", ")
            ))),
        }
    }
}

/// Options for rendering one generated source directory
#[derive(Debug, Clone)]
pub struct RenderCodeOptions {
    /// Directory holding the generated `index.ts`
    pub srcdir: PathBuf,
    pub outdir: PathBuf,
    pub language: Language,
    /// Registry type name or product class name
    pub type_name: String,
    /// Required for golang
    pub go_module: Option<String>,
    /// Required for java
    pub java_package: Option<String>,
    /// Defaults to the type name
    pub csharp_namespace: Option<String>,
}

/// Language-specific settings of a cross-compile request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LanguageTarget {
    Python { module_name: String },
    Java { package: String },
    CSharp { namespace: String },
    Golang { module: String, package_name: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileRequest {
    pub srcdir: PathBuf,
    pub outdir: PathBuf,
    pub target: LanguageTarget,
}

impl CompileRequest {
    /// Build the request for a non-TypeScript language
    pub fn from_options(options: &RenderCodeOptions) -> Result<Self> {
        let target = match options.language {
            Language::TypeScript => {
                return Err(ImportError::Compile(
                    "TypeScript output is copied, not compiled".to_string(),
                ))
            }
            Language::Python => LanguageTarget::Python {
                module_name: snake_case(&options.type_name),
            },
            Language::CSharp => LanguageTarget::CSharp {
                namespace: options
                    .csharp_namespace
                    .clone()
                    .unwrap_or_else(|| options.type_name.clone()),
            },
            Language::Java => LanguageTarget::Java {
                package: options.java_package.clone().ok_or_else(|| {
                    ImportError::Config(
                        "Java package name (`--java-package`) must be specified (e.g. \"com.foo.bar.my.resource\")"
                            .to_string(),
                    )
                })?,
            },
            Language::Golang => LanguageTarget::Golang {
                module: options.go_module.clone().ok_or_else(|| {
                    ImportError::Config(
                        "Go module name (`--go-module`) is required (e.g. \"github.com/foo/bar\")"
                            .to_string(),
                    )
                })?,
                package_name: kebab_case(&options.type_name),
            },
        };

        Ok(Self {
            srcdir: options.srcdir.clone(),
            outdir: options.outdir.clone(),
            target,
        })
    }
}

/// Backend turning a TypeScript source directory into another language
#[cfg_attr(test, automock)]
#[async_trait]
pub trait CrossCompiler: Send + Sync {
    async fn compile(&self, request: &CompileRequest) -> Result<()>;
}

/// Locate an installed node package the way `require.resolve` would,
/// walking up from `start` through `node_modules` directories
pub fn resolve_node_module(package: &str, start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join("node_modules").join(package))
        .find(|candidate| candidate.join("package.json").is_file())
}

/// [`CrossCompiler`] spawning the `jsii-srcmak` executable
#[derive(Debug, Clone)]
pub struct SrcmakCompiler {
    program: String,
    deps: Vec<PathBuf>,
}

impl SrcmakCompiler {
    pub fn new(program: &str) -> Self {
        Self {
            program: program.to_string(),
            deps: Vec::new(),
        }
    }

    /// Module directories passed as `--dep`
    pub fn with_deps(mut self, deps: Vec<PathBuf>) -> Self {
        self.deps = deps;
        self
    }

    /// Build from configuration, resolving each configured dependency to
    /// its module directory from the current directory
    pub fn from_config(config: &ImportConfig) -> Self {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::new(&config.srcmak_program).with_deps(resolve_deps(&config.srcmak_deps, &cwd))
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn deps(&self) -> &[PathBuf] {
        &self.deps
    }

    /// Command-line arguments for `request`
    pub fn arguments(&self, request: &CompileRequest) -> Vec<String> {
        let outdir = request.outdir.display().to_string();
        let mut args = vec![request.srcdir.display().to_string()];

        for dep in &self.deps {
            args.extend(["--dep".to_string(), dep.display().to_string()]);
        }

        match &request.target {
            LanguageTarget::Python { module_name } => {
                args.extend(["--python-outdir".to_string(), outdir]);
                args.extend(["--python-module-name".to_string(), module_name.clone()]);
            }
            LanguageTarget::Java { package } => {
                args.extend(["--java-outdir".to_string(), outdir]);
                args.extend(["--java-package".to_string(), package.clone()]);
            }
            LanguageTarget::CSharp { namespace } => {
                args.extend(["--csharp-outdir".to_string(), outdir]);
                args.extend(["--csharp-namespace".to_string(), namespace.clone()]);
            }
            LanguageTarget::Golang {
                module,
                package_name,
            } => {
                args.extend(["--golang-outdir".to_string(), outdir]);
                args.extend(["--golang-module".to_string(), module.clone()]);
                args.extend(["--golang-package".to_string(), package_name.clone()]);
            }
        }

        args
    }
}

/// Paths are kept as given; package names are looked up under `node_modules`
fn resolve_deps(deps: &[String], start: &Path) -> Vec<PathBuf> {
    deps.iter()
        .map(|dep| {
            let path = Path::new(dep);
            if path.is_absolute() || path.is_dir() {
                return path.to_path_buf();
            }
            resolve_node_module(dep, start).unwrap_or_else(|| {
                warn!(package = %dep, "Dependency not found in node_modules; passing it as given");
                path.to_path_buf()
            })
        })
        .collect()
}

impl Default for SrcmakCompiler {
    fn default() -> Self {
        Self::new(DEFAULT_SRCMAK_PROGRAM)
    }
}

#[async_trait]
impl CrossCompiler for SrcmakCompiler {
    async fn compile(&self, request: &CompileRequest) -> Result<()> {
        let args = self.arguments(request);
        debug!(program = %self.program, ?args, "Spawning cross-compiler");

        let status = Command::new(&self.program)
            .args(&args)
            .status()
            .await
            .map_err(|e| {
                ImportError::Compile(format!("Failed to run '{}': {}", self.program, e))
            })?;

        if !status.success() {
            return Err(ImportError::Compile(format!(
                "'{}' failed with exit code: {}",
                self.program, status
            )));
        }

        Ok(())
    }
}

/// Copy or cross-compile the generated source into `options.outdir`
pub async fn render_code(options: &RenderCodeOptions, compiler: &dyn CrossCompiler) -> Result<()> {
    fs::create_dir_all(&options.outdir).await?;

    if options.language == Language::TypeScript {
        let target = typescript_target(&options.outdir, &options.type_name);
        fs::copy(options.srcdir.join(INDEX_FILE), &target).await?;
        info!(path = %target.display(), "Wrote TypeScript source");
        return Ok(());
    }

    let request = CompileRequest::from_options(options)?;
    compiler.compile(&request).await?;
    info!(language = %options.language, outdir = %options.outdir.display(), "Rendered construct");
    Ok(())
}

fn typescript_target(outdir: &Path, type_name: &str) -> PathBuf {
    outdir.join(format!("{}.ts", kebab_case(type_name)))
}
