//! cdk-import CLI
//!
//! Command-line interface for generating CDK constructs from registry types
//! and catalog products.

use anyhow::{bail, Context, Result};
use cdk_import_common::ImportConfig;
use cdk_import_generator::naming::kebab_case;
use cdk_import_importer::{
    import_product, import_products, import_resource_type, render_code, split_type_reference,
    ImportOptions, Language, ProductImportOptions, RenderCodeOptions, SrcmakCompiler,
    SUPPORTED_LANGUAGES,
};
use cdk_import_registry::{ProductAggregateOptions, SdkCatalogClient, SdkRegistryClient};
use clap::{Args, Parser, Subcommand};
use colored::*;
use futures::future::try_join_all;
use std::path::{Path, PathBuf};
use tracing_subscriber::prelude::*;

#[derive(Parser)]
#[command(name = "cdk-import")]
#[command(
    version,
    about = "Generate CDK constructs from CloudFormation registry types and Service Catalog products",
    long_about = None,
    args_conflicts_with_subcommands = true
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    cfn: CfnArgs,

    /// Path to a YAML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Import a CloudFormation registry type (default)
    #[command(after_help = "EXAMPLES:\n  \
        # Latest version of AWSQS::EKS::Cluster in TypeScript\n  \
        cdk-import -l typescript AWSQS::EKS::Cluster\n\n  \
        # Go construct for a specific version\n  \
        cdk-import -l golang --go-module \"github.com/account/repo\" AWSQS::EKS::Cluster@1.2.0\n\n  \
        # Python under ./src, type identified by its ARN\n  \
        cdk-import -l python -o src arn:aws:cloudformation:...\n\n  \
        # Private type registered in your account\n  \
        cdk-import -l typescript --private Acme::SuperService::Friend::MODULE")]
    Cfn(CfnArgs),

    /// Import Service Catalog products
    #[command(after_help = "EXAMPLES:\n  \
        # Latest version of every available product in TypeScript\n  \
        cdk-import sc -l typescript\n\n  \
        # Go construct for a specific product version\n  \
        cdk-import sc -l golang --go-module \"github.com/account/repo\" \\\n    \
        --product-id prod-abc123 --provisioning-artifact-id pa-abc123 --path-id lp-abc123")]
    Sc(ScArgs),
}

/// Output language options shared by both commands
#[derive(Args, Clone, Default)]
struct LanguageArgs {
    /// Output programming language
    #[arg(short, long, value_parser = parse_language)]
    language: Option<Language>,

    /// Go module name (required if language is "golang")
    #[arg(long)]
    go_module: Option<String>,

    /// Java package name (required if language is "java")
    #[arg(long)]
    java_package: Option<String>,

    /// C# namespace
    #[arg(long)]
    csharp_namespace: Option<String>,
}

#[derive(Args, Clone)]
struct CfnArgs {
    #[command(flatten)]
    language: LanguageArgs,

    /// Output directory
    #[arg(short, long, default_value = ".")]
    outdir: PathBuf,

    /// Import types registered in your account and region
    #[arg(long)]
    private: bool,

    /// Type name or ARN, optionally suffixed with @VERSION
    resource: Option<String>,
}

#[derive(Args, Clone)]
struct ScArgs {
    #[command(flatten)]
    language: LanguageArgs,

    /// Output directory
    #[arg(short, long, default_value = "./sc-products")]
    outdir: PathBuf,

    /// Product id; all available products are imported when omitted
    #[arg(long)]
    product_id: Option<String>,

    /// Provisioning artifact id
    #[arg(long, requires = "product_id")]
    provisioning_artifact_id: Option<String>,

    /// Launch path id
    #[arg(long, requires = "product_id")]
    path_id: Option<String>,
}

fn parse_language(value: &str) -> std::result::Result<Language, String> {
    value.parse().map_err(|e: cdk_import_common::ImportError| e.to_string())
}

impl LanguageArgs {
    /// The selected language, validated against its required options
    fn validate(&self) -> Result<Language> {
        let language = match self.language {
            Some(language) => language,
            None => bail!(
                "Missing required option: --language. Supported languages: {}",
                SUPPORTED_LANGUAGES.join(", ")
            ),
        };

        if language == Language::Java && self.java_package.is_none() {
            bail!("Java package name (`--java-package`) must be specified (e.g. \"com.foo.bar.my.resource\")");
        }
        if language == Language::Golang && self.go_module.is_none() {
            bail!("Go module name (`--go-module`) is required (e.g. \"github.com/foo/bar\")");
        }

        Ok(language)
    }

    fn render_options(
        &self,
        language: Language,
        srcdir: &Path,
        outdir: &Path,
        type_name: &str,
        csharp_namespace: Option<String>,
    ) -> RenderCodeOptions {
        RenderCodeOptions {
            srcdir: srcdir.to_path_buf(),
            outdir: outdir.to_path_buf(),
            language,
            type_name: type_name.to_string(),
            go_module: self.go_module.clone(),
            java_package: self.java_package.clone(),
            csharp_namespace,
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "cdk_import=debug"
    } else {
        "cdk_import=info"
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.verbose {
        println!("{} Verbose mode enabled", "→".cyan());
    }

    let config =
        ImportConfig::resolve(cli.config.as_deref()).context("Failed to load configuration")?;
    tracing::debug!(
        region = ?config.region,
        registry = ?config.registry.endpoint,
        catalog = ?config.catalog.endpoint,
        "Loaded configuration"
    );

    match cli.command {
        Some(Commands::Sc(args)) => sc_command(&args, &config).await,
        Some(Commands::Cfn(args)) => cfn_command(&args, &config).await,
        None => cfn_command(&cli.cfn, &config).await,
    }
}

async fn cfn_command(args: &CfnArgs, config: &ImportConfig) -> Result<()> {
    let language = args.language.validate()?;
    let reference = match &args.resource {
        Some(reference) => reference,
        None => bail!("Please specify a resource name: cdk-import -l LANGUAGE RESOURCE-NAME[@VERSION]"),
    };
    let (name, version) = split_type_reference(reference);

    println!("{} Importing {}", "→".cyan(), name.yellow());

    let client = SdkRegistryClient::from_config(config).await;
    let workdir = tempfile::Builder::new()
        .prefix("cdk-import")
        .tempdir()
        .context("Failed to create working directory")?;

    let type_name = import_resource_type(
        &client,
        name,
        version,
        &ImportOptions {
            outdir: workdir.path().to_path_buf(),
            private: args.private,
        },
    )
    .await
    .with_context(|| format!("Failed to import {}", name))?;
    println!("{} Resolved {}", "✓".green(), type_name.cyan());

    println!("{} Rendering {} code...", "→".cyan(), language);
    let csharp_namespace = args
        .language
        .csharp_namespace
        .clone()
        .unwrap_or_else(|| type_name.clone());
    let options = args.language.render_options(
        language,
        workdir.path(),
        &args.outdir,
        &type_name,
        Some(csharp_namespace),
    );
    render_code(&options, &SrcmakCompiler::from_config(config))
        .await
        .context("Failed to render code")?;

    println!("\n{}", "✓ Import complete!".green().bold());
    println!("  Output: {}", args.outdir.display());

    Ok(())
}

async fn sc_command(args: &ScArgs, config: &ImportConfig) -> Result<()> {
    let language = args.language.validate()?;
    if language == Language::CSharp && args.language.csharp_namespace.is_none() {
        bail!("C# namespace name (`--csharp-namespace`) must be specified (e.g. \"AWS::Foo::Bar\")");
    }

    let client = SdkCatalogClient::from_config(config).await;
    let workdir = tempfile::Builder::new()
        .prefix("cdk-import")
        .tempdir()
        .context("Failed to create working directory")?;

    let products = match &args.product_id {
        Some(product_id) => {
            println!("{} Importing product {}", "→".cyan(), product_id.yellow());
            let options = ProductImportOptions {
                outdir: workdir.path().to_path_buf(),
                product: ProductAggregateOptions {
                    product_id: product_id.clone(),
                    provisioning_artifact_id: args.provisioning_artifact_id.clone(),
                    launch_path_id: args.path_id.clone(),
                },
            };
            vec![import_product(&client, &options)
                .await
                .with_context(|| format!("Failed to import product {}", product_id))?]
        }
        None => {
            println!("{} Importing all available products", "→".cyan());
            import_products(&client, workdir.path())
                .await
                .context("Failed to list products")?
        }
    };
    println!("{} Generated {} product construct(s)", "✓".green(), products.len());

    println!("{} Rendering {} code...", "→".cyan(), language);
    let compiler = SrcmakCompiler::from_config(config);
    try_join_all(products.iter().map(|product| {
        let srcdir = workdir.path().join(kebab_case(product));
        let csharp_namespace = args
            .language
            .csharp_namespace
            .as_ref()
            .map(|namespace| format!("{}::{}", namespace, product));
        let options =
            args.language
                .render_options(language, &srcdir, &args.outdir, product, csharp_namespace);
        let compiler = &compiler;
        async move { render_code(&options, compiler).await }
    }))
    .await
    .context("Failed to render code")?;

    println!("\n{}", "✓ Import complete!".green().bold());
    for product in &products {
        println!("  {} {}", "•".cyan(), product);
    }
    println!("  Output: {}", args.outdir.display());

    Ok(())
}
