use std::io;
use std::path::{Path, PathBuf};

use log::{debug, error, info};
use tl::{HTMLTag, NodeHandle, ParserOptions, VDom};

use crate::models::html::{HtmlRewriteInput, HtmlRewriteOutput};
use crate::models::path_map::{relative_reference, OutputKind};
use crate::models::pipeline::PipelineContext;
use crate::service::script::ScriptProfile;
use crate::service::traits::i_service::HtmlServiceTrait;
use crate::service::transform::{Capability, TransformDispatch};
use crate::utils::file::write_file;
use crate::utils::html::RawTextBlocks;

/// HTML 服務，負責改寫文件中的腳本與樣式引用並實現 HtmlServiceTrait
pub struct HtmlService {
    dispatch: TransformDispatch,
}

impl HtmlService {
    pub fn new(dispatch: TransformDispatch) -> Self {
        HtmlService { dispatch }
    }
}

impl Default for HtmlService {
    fn default() -> Self {
        HtmlService::new(TransformDispatch::default())
    }
}

/// 外部引用：屬性值與對應的轉換方式
struct Reference<'r> {
    value: &'r str,
    capability: Capability,
    kind: OutputKind,
}

impl HtmlServiceTrait for HtmlService {
    fn rewrite(&self, input: HtmlRewriteInput, ctx: &PipelineContext) -> io::Result<HtmlRewriteOutput> {
        // 先算出 HTML 的輸出位置，所有引用都以它為基準計算相對路徑
        let final_html_path = ctx.mapper.map(&input.html_path, OutputKind::Html);
        let html_dir = input.html_path.parent().unwrap_or(ctx.input_root.as_path()).to_path_buf();

        let (masked, mut blocks) = RawTextBlocks::extract(&input.content);
        let mut dom = tl::parse(&masked, ParserOptions::default()).map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("HTML 解析失敗：{}：{:?}", input.html_path.display(), e),
            )
        })?;

        let mut out = HtmlRewriteOutput {
            output_path: final_html_path.clone(),
            ..HtmlRewriteOutput::default()
        };

        for handle in query_all(&dom, "script") {
            let Some(tag) = tag_of(&dom, handle) else {
                continue;
            };
            let Some(module) = script_kind(attribute(tag, "type").as_deref()) else {
                debug!("略過非 JavaScript 的 script 區塊");
                continue;
            };
            let src = attribute(tag, "src").filter(|s| !s.trim().is_empty());

            match src {
                Some(src) => {
                    let reference = Reference {
                        value: &src,
                        capability: Capability::Script {
                            profile: ScriptProfile::File,
                            module,
                        },
                        kind: OutputKind::Script,
                    };
                    if let Some(new_src) = self.process_external(&reference, &html_dir, &final_html_path, ctx, &mut out) {
                        set_attribute(&mut dom, handle, "src", new_src);
                        out.scripts_obfuscated += 1;
                    }
                }
                None => {
                    let capability = Capability::Script {
                        profile: ScriptProfile::Inline,
                        module,
                    };
                    if self.process_inline(&dom, handle, &mut blocks, capability, &input.html_path, &mut out) {
                        info!("混淆內嵌 JS：{}", input.html_path.display());
                    }
                }
            }
        }

        if ctx.minify_css {
            for handle in query_all(&dom, "link") {
                let Some(tag) = tag_of(&dom, handle) else {
                    continue;
                };
                let is_stylesheet = attribute(tag, "rel").is_some_and(|rel| {
                    rel.split_ascii_whitespace()
                        .any(|t| t.eq_ignore_ascii_case("stylesheet"))
                });
                let Some(href) = attribute(tag, "href").filter(|h| is_stylesheet && !h.trim().is_empty()) else {
                    continue;
                };
                let reference = Reference {
                    value: &href,
                    capability: Capability::Stylesheet,
                    kind: OutputKind::Stylesheet,
                };
                if let Some(new_href) = self.process_external(&reference, &html_dir, &final_html_path, ctx, &mut out) {
                    set_attribute(&mut dom, handle, "href", new_href);
                    out.styles_minified += 1;
                }
            }

            for handle in query_all(&dom, "style") {
                if self.process_inline(&dom, handle, &mut blocks, Capability::Stylesheet, &input.html_path, &mut out) {
                    info!("壓縮內嵌 CSS：{}", input.html_path.display());
                }
            }
        }

        let mut html = blocks.restore(&dom.outer_html());
        if let Some(doctype) = leading_doctype(&input.content) {
            if leading_doctype(&html).is_none() {
                html.insert_str(0, doctype);
            }
        }
        out.html = html;
        Ok(out)
    }
}

impl HtmlService {
    /// 轉換外部腳本或樣式表並寫到輸出目錄，回傳新的引用路徑；
    /// 找不到檔案或轉換失敗時回傳 None，引用保持不變
    fn process_external(
        &self,
        reference: &Reference<'_>,
        html_dir: &Path,
        final_html_path: &Path,
        ctx: &PipelineContext,
        out: &mut HtmlRewriteOutput,
    ) -> Option<String> {
        if is_remote(reference.value) {
            debug!("略過遠端引用：{}", reference.value);
            return None;
        }

        let candidate = html_dir.join(reference.value);
        if !candidate.is_file() {
            info!("找不到引用的檔案，保留原引用：{}", candidate.display());
            return None;
        }
        let source_path = candidate.canonicalize().unwrap_or(candidate);

        let transformed = match self.dispatch.transform_file(&source_path, reference.capability) {
            Ok(data) => data,
            Err(e) => {
                error!("轉換 {} 失敗: {}", source_path.display(), e);
                out.failures += 1;
                return None;
            }
        };

        let target = ctx.mapper.map(&source_path, reference.kind);
        if let Err(e) = write_file(&target, &transformed) {
            error!("寫入 {} 失敗: {}", target.display(), e);
            out.failures += 1;
            return None;
        }

        match reference.kind {
            OutputKind::Stylesheet => info!("壓縮並儲存 CSS：{}", target.display()),
            _ => info!("混淆並儲存 JS：{}", target.display()),
        }
        out.handled.push(source_path);
        Some(relative_reference(final_html_path, &target))
    }

    fn process_inline(
        &self,
        dom: &VDom<'_>,
        handle: NodeHandle,
        blocks: &mut RawTextBlocks,
        capability: Capability,
        html_path: &Path,
        out: &mut HtmlRewriteOutput,
    ) -> bool {
        let index = match inline_block(dom, handle, blocks) {
            InlineBody::Empty => return false,
            InlineBody::Block(index) => index,
            InlineBody::Unparsed => {
                error!("內嵌區塊無法辨識，保留原內容：{}", html_path.display());
                out.failures += 1;
                return false;
            }
        };
        let Some(text) = blocks.body(index) else {
            return false;
        };
        if text.trim().is_empty() {
            return false;
        }
        match self.dispatch.transform(capability, text) {
            Ok(transformed) => blocks.replace(index, transformed),
            Err(e) => {
                error!("內嵌區塊轉換失敗：{}：{}", html_path.display(), e);
                out.failures += 1;
                false
            }
        }
    }
}

fn query_all(dom: &VDom<'_>, selector: &str) -> Vec<NodeHandle> {
    dom.query_selector(selector)
        .map(|it| it.collect())
        .unwrap_or_default()
}

fn tag_of<'p, 'a>(dom: &'p VDom<'a>, handle: NodeHandle) -> Option<&'p HTMLTag<'a>> {
    handle.get(dom.parser()).and_then(|node| node.as_tag())
}

fn attribute(tag: &HTMLTag<'_>, name: &'static str) -> Option<String> {
    tag.attributes()
        .get(name)
        .flatten()
        .map(|v| v.as_utf8_str().into_owned())
}

fn set_attribute(dom: &mut VDom<'_>, handle: NodeHandle, name: &'static str, value: String) -> bool {
    let Some(tag) = handle.get_mut(dom.parser_mut()).and_then(|node| node.as_tag_mut()) else {
        return false;
    };
    match tag.attributes_mut().get_mut(name) {
        Some(Some(bytes)) => bytes.set(value.into_bytes()).is_ok(),
        _ => false,
    }
}

enum InlineBody {
    Empty,
    Block(usize),
    Unparsed,
}

/// script / style 的內容在解析前已換成單一佔位文字節點
fn inline_block(dom: &VDom<'_>, handle: NodeHandle, blocks: &RawTextBlocks) -> InlineBody {
    let Some(tag) = tag_of(dom, handle) else {
        return InlineBody::Unparsed;
    };
    let children: Vec<NodeHandle> = tag.children().top().iter().copied().collect();
    match children.as_slice() {
        [] => InlineBody::Empty,
        [child] => match child.get(dom.parser()) {
            Some(tl::Node::Raw(bytes)) => blocks
                .index_of(&bytes.as_utf8_str())
                .map_or(InlineBody::Unparsed, InlineBody::Block),
            _ => InlineBody::Unparsed,
        },
        _ => InlineBody::Unparsed,
    }
}

/// 判斷 script 的 type：JavaScript 回傳是否為 module，其他類型（JSON、模板）回傳 None
fn script_kind(type_attr: Option<&str>) -> Option<bool> {
    let Some(ty) = type_attr.map(|t| t.trim().to_ascii_lowercase()) else {
        return Some(false);
    };
    match ty.as_str() {
        "" | "text/javascript" | "application/javascript" | "text/ecmascript"
        | "application/ecmascript" | "application/x-javascript" => Some(false),
        "module" => Some(true),
        _ => None,
    }
}

fn is_remote(reference: &str) -> bool {
    let r = reference.trim();
    r.starts_with("//") || r.contains("://") || r.starts_with("data:")
}

fn leading_doctype(source: &str) -> Option<&str> {
    let trimmed = source.trim_start();
    let is_doctype = trimmed
        .get(..9)
        .is_some_and(|p| p.eq_ignore_ascii_case("<!doctype"));
    if !is_doctype {
        return None;
    }
    let end = trimmed.find('>')?;
    Some(&trimmed[..=end])
}

/// 讀取 HTML 檔案；非 UTF-8 的位元組以替代字元取代
pub fn read_html_input(html_path: PathBuf) -> io::Result<HtmlRewriteInput> {
    let bytes = std::fs::read(&html_path)?;
    let content = String::from_utf8_lossy(&bytes).into_owned();
    Ok(HtmlRewriteInput { html_path, content })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::path_map::StructureMode;
    use std::fs;
    use tempfile::TempDir;

    const APP_JS: &str = "function formatPrice(amountInCents) {\n    var dollarsValue = amountInCents / 100;\n    return '$' + dollarsValue;\n}\n";
    const SITE_CSS: &str = "body {\n    margin: 0;\n}\n";

    fn make_site() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let root = dir.path().canonicalize().unwrap().join("site");
        fs::create_dir_all(root.join("js")).unwrap();
        fs::create_dir_all(root.join("css")).unwrap();
        fs::create_dir_all(root.join("pages")).unwrap();
        fs::write(root.join("js/app.js"), APP_JS).unwrap();
        fs::write(root.join("css/site.css"), SITE_CSS).unwrap();
        (dir, root)
    }

    fn context(root: &Path, mode: StructureMode, minify_css: bool) -> PipelineContext {
        let output = root.parent().unwrap().join("site_out");
        PipelineContext::new(root.to_path_buf(), root.to_path_buf(), output, mode, minify_css)
    }

    fn rewrite(root: &Path, rel: &str, html: &str, ctx: &PipelineContext) -> HtmlRewriteOutput {
        let html_path = root.join(rel);
        fs::write(&html_path, html).unwrap();
        HtmlService::default()
            .rewrite(read_html_input(html_path).unwrap(), ctx)
            .unwrap()
    }

    #[test]
    fn nested_page_references_resolve_from_output() {
        let (_dir, root) = make_site();
        let ctx = context(&root, StructureMode::Preserve, true);
        let html = r#"<html><head><link rel="stylesheet" href="../css/site.css"></head><body><script src="../js/app.js"></script></body></html>"#;
        let out = rewrite(&root, "pages/about.html", html, &ctx);

        assert_eq!(out.output_path, ctx.output_root().join("pages/about.html"));
        assert!(out.html.contains("../js/app.js"));
        assert!(out.html.contains("../css/site.css"));

        let js = fs::read_to_string(ctx.output_root().join("js/app.js")).unwrap();
        assert!(js.contains("formatPrice"));
        assert!(!js.contains("dollarsValue"));
        let css = fs::read_to_string(ctx.output_root().join("css/site.css")).unwrap();
        assert_eq!(css, "body{margin:0}");

        assert_eq!(out.scripts_obfuscated, 1);
        assert_eq!(out.styles_minified, 1);
        assert!(out.handled.contains(&root.join("js/app.js")));
        assert!(out.handled.contains(&root.join("css/site.css")));
    }

    #[test]
    fn flatten_rewrites_to_prefixed_siblings() {
        let (_dir, root) = make_site();
        let ctx = context(&root, StructureMode::Flatten, true);
        let html = r#"<html><head><link rel="stylesheet" href="../css/site.css"></head><body><script src="../js/app.js"></script></body></html>"#;
        let out = rewrite(&root, "pages/about.html", html, &ctx);

        assert_eq!(out.output_path, ctx.output_root().join("obf_about.html"));
        assert!(out.html.contains(r#"src="obf_app.js""#));
        assert!(out.html.contains(r#"href="min_site.css""#));
        assert!(ctx.output_root().join("obf_app.js").is_file());
        assert!(ctx.output_root().join("min_site.css").is_file());
    }

    #[test]
    fn missing_and_remote_references_are_untouched() {
        let (_dir, root) = make_site();
        let ctx = context(&root, StructureMode::Flatten, true);
        let html = r#"<html><head><script src="https://cdn.example.com/lib.js"></script><link rel="stylesheet" href="missing.css"></head><body><script src="nope/missing.js"></script></body></html>"#;
        let out = rewrite(&root, "index.html", html, &ctx);

        assert!(out.html.contains("https://cdn.example.com/lib.js"));
        assert!(out.html.contains(r#"href="missing.css""#));
        assert!(out.html.contains(r#"src="nope/missing.js""#));
        assert!(out.handled.is_empty());
        assert_eq!(out.failures, 0);
    }

    #[test]
    fn inline_blocks_are_transformed_in_place() {
        let (_dir, root) = make_site();
        let ctx = context(&root, StructureMode::Preserve, true);
        let html = "<!DOCTYPE html>\n<html><head><style>\n  h1 {\n    color: red;\n  }\n</style></head><body><script type=\"application/ld+json\">{\"name\": \"demo\"}</script><script>\nvar totalClicks = 0;\nfunction track(clickWeight) {\n  totalClicks += clickWeight;\n}\n</script></body></html>";
        let out = rewrite(&root, "index.html", html, &ctx);

        assert!(out.html.starts_with("<!DOCTYPE html>"));
        assert!(out.html.contains("h1{color:red}"));
        assert!(out.html.contains(r#"{"name": "demo"}"#));
        assert!(out.html.contains("totalClicks"));
        assert!(!out.html.contains("clickWeight"));
    }

    #[test]
    fn raw_text_with_markup_characters_survives() {
        let (_dir, root) = make_site();
        let ctx = context(&root, StructureMode::Preserve, true);
        let html = "<!DOCTYPE html>\n<html><head><title>a < b</title><style>ul > li { color: red; }</style></head><body><script>\nvar readyState = 0;\nif (readyState < 2 && document.body) {\n  document.body.insertAdjacentHTML('beforeend', \"<div>hi</div>\");\n}\n</script><textarea><b>x</b></textarea></body></html>";
        let out = rewrite(&root, "index.html", html, &ctx);

        assert_eq!(out.failures, 0);
        assert!(out.html.starts_with("<!DOCTYPE html>\n<html>"));
        assert!(out.html.contains("<title>a < b</title>"));
        assert!(out.html.contains("ul>li{color:red}"));
        assert!(out.html.contains("readyState<2&&document.body"));
        assert!(out.html.contains("<div>hi</div>"));
        assert!(out.html.contains("<textarea><b>x</b></textarea>"));
        assert!(!out.html.contains("\nvar readyState"));
    }

    #[test]
    fn globals_called_from_markup_are_kept() {
        let (_dir, root) = make_site();
        fs::write(
            root.join("js/menu.js"),
            "function openMenu(menuId) {\n  document.getElementById(menuId).hidden = false;\n}\n",
        )
        .unwrap();
        let ctx = context(&root, StructureMode::Preserve, true);
        let html = r#"<html><body><button onclick="openMenu('nav')">menu</button><script src="js/menu.js"></script><script>var menuLabel = 'Menu';</script></body></html>"#;
        let out = rewrite(&root, "index.html", html, &ctx);

        let js = fs::read_to_string(ctx.output_root().join("js/menu.js")).unwrap();
        assert!(js.contains("function openMenu("));
        assert!(!js.contains("menuId"));
        assert!(out.html.contains(r#"onclick="openMenu('nav')""#));
        assert!(out.html.contains("menuLabel"));
    }

    #[test]
    fn css_left_alone_when_minification_disabled() {
        let (_dir, root) = make_site();
        let ctx = context(&root, StructureMode::Flatten, false);
        let html = r#"<html><head><link rel="stylesheet" href="css/site.css"><style>p { margin : 0 ; }</style></head><body></body></html>"#;
        let out = rewrite(&root, "index.html", html, &ctx);

        assert!(out.html.contains(r#"href="css/site.css""#));
        assert!(out.html.contains("p { margin : 0 ; }"));
        assert!(!ctx.output_root().join("min_site.css").exists());
        assert_eq!(out.styles_minified, 0);
    }

    #[test]
    fn broken_script_is_reported_and_reference_kept() {
        let (_dir, root) = make_site();
        fs::write(root.join("js/broken.js"), "function (").unwrap();
        let ctx = context(&root, StructureMode::Flatten, true);
        let html = r#"<html><body><script src="js/broken.js"></script></body></html>"#;
        let out = rewrite(&root, "index.html", html, &ctx);

        assert_eq!(out.failures, 1);
        assert!(out.html.contains(r#"src="js/broken.js""#));
        assert!(!ctx.output_root().join("obf_broken.js").exists());
    }

    #[test]
    fn script_type_detection() {
        assert_eq!(script_kind(None), Some(false));
        assert_eq!(script_kind(Some("text/javascript")), Some(false));
        assert_eq!(script_kind(Some("MODULE")), Some(true));
        assert_eq!(script_kind(Some("application/ld+json")), None);
        assert_eq!(script_kind(Some("text/template")), None);
    }
}
