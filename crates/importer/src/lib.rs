//! Import pipelines for cdk-import
//!
//! Resolves a registry type or catalog product, writes the generated
//! TypeScript into a working directory and renders it into the requested
//! language.

mod import;
mod languages;

pub use import::{
    import_product, import_products, import_resource_type, split_type_reference, ImportOptions,
    ProductImportOptions, INDEX_FILE,
};
pub use languages::{
    render_code, CompileRequest, CrossCompiler, Language, LanguageTarget, RenderCodeOptions,
    SrcmakCompiler, SUPPORTED_LANGUAGES,
};
