//! Kind-specific compressors used by the minify transform.
//!
//! Uses oxc for JavaScript and lightningcss for CSS.

use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};
use oxc::allocator::Allocator;
use oxc::codegen::{Codegen, CodegenOptions, CommentOptions};
use oxc::mangler::MangleOptions;
use oxc::minifier::{CompressOptions, Minifier, MinifierOptions};
use oxc::parser::Parser;
use oxc::span::SourceType;
use std::sync::Arc;

use crate::asset::AssetKind;
use crate::error::{AssetError, Result};

/// Turns source text into its minified form.
pub trait Compressor: Send + Sync {
    /// `locale` governs locale-sensitive output such as numeric literals.
    fn compress(&self, source: &str, locale: &str) -> Result<String>;
}

/// Stylesheet compressor (lightningcss minifying printer).
#[derive(Debug, Default, Clone, Copy)]
pub struct LightningCssCompressor;

impl Compressor for LightningCssCompressor {
    fn compress(&self, source: &str, _locale: &str) -> Result<String> {
        let fail = |message: String| AssetError::Compress {
            kind: AssetKind::Css,
            message,
        };

        let stylesheet =
            StyleSheet::parse(source, ParserOptions::default()).map_err(|e| fail(e.to_string()))?;
        let result = stylesheet
            .to_css(PrinterOptions {
                minify: true,
                ..PrinterOptions::default()
            })
            .map_err(|e| fail(e.to_string()))?;
        Ok(result.code)
    }
}

/// Script compressor (oxc parse + minify + minifying codegen).
///
/// Sources are parsed as classic scripts: top-level declarations are page
/// globals and are never dropped or renamed. Output numeric literals always use ECMAScript grammar, so the locale
/// does not change the result.
#[derive(Debug, Default, Clone, Copy)]
pub struct OxcCompressor;

impl Compressor for OxcCompressor {
    fn compress(&self, source: &str, _locale: &str) -> Result<String> {
        let allocator = Allocator::default();
        let ret = Parser::new(&allocator, source, SourceType::script()).parse();
        if let Some(error) = ret.errors.first() {
            return Err(AssetError::Compress {
                kind: AssetKind::Javascript,
                message: error.to_string(),
            });
        }

        let mut program = ret.program;
        let options = MinifierOptions {
            mangle: Some(MangleOptions::default()),
            compress: Some(CompressOptions::smallest()),
        };
        let ret = Minifier::new(options).minify(&allocator, &mut program);
        let code = Codegen::new()
            .with_options(CodegenOptions {
                minify: true,
                comments: CommentOptions::disabled(),
                ..CodegenOptions::default()
            })
            .with_scoping(ret.scoping)
            .build(&program)
            .code;
        Ok(code)
    }
}

/// Built-in compressor for a kind.
pub fn default_compressor(kind: AssetKind) -> Arc<dyn Compressor> {
    match kind {
        AssetKind::Css => Arc::new(LightningCssCompressor),
        AssetKind::Javascript => Arc::new(OxcCompressor),
    }
}
