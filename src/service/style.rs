use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};

use crate::error::{TransformError, TransformResult};
use crate::service::traits::i_service::StyleServiceTrait;

/// CSS 壓縮服務，外部樣式表與內嵌 <style> 共用同一組設定
pub struct StyleService;

impl StyleService {
    pub fn new() -> Self {
        StyleService
    }
}

impl Default for StyleService {
    fn default() -> Self {
        StyleService::new()
    }
}

impl StyleServiceTrait for StyleService {
    fn minify(&self, source: &str) -> TransformResult<String> {
        let stylesheet = StyleSheet::parse(source, ParserOptions::default())
            .map_err(|e| TransformError::Stylesheet(e.to_string()))?;
        let result = stylesheet
            .to_css(PrinterOptions {
                minify: true,
                ..PrinterOptions::default()
            })
            .map_err(|e| TransformError::Stylesheet(e.to_string()))?;
        Ok(result.code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_whitespace_and_comments() {
        let css = "/* layout */\nbody {\n    margin: 0px;\n    color: #ff0000;\n}\n\n.card  >  p {\n    padding: 4px 4px 4px 4px;\n}\n";
        let out = StyleService::new().minify(css).unwrap();
        assert!(!out.contains("layout"));
        assert!(!out.contains('\n'));
        assert!(out.starts_with("body{"));
        assert!(out.contains(".card>p"));
        assert!(out.len() < css.len());
    }

    #[test]
    fn empty_stylesheet() {
        assert_eq!(StyleService::new().minify("").unwrap(), "");
    }
}
