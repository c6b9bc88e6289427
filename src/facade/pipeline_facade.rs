use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use log::{error, info, warn};

use crate::config::ports::{AppConfig, PipelinePort};
use crate::facade::traits::i_pipeline::PipelineFacadeTrait;
use crate::models::pipeline::{PipelineContext, PipelineOutput};
use crate::service::html::{read_html_input, HtmlService};
use crate::service::traits::i_service::HtmlServiceTrait;
use crate::service::transform::{FileRole, TransformDispatch};
use crate::utils::file::{copy_all_assets, html_files_or_single, walk_files, write_file};
use crate::utils::utils::{create_output_root, ProgressManager};

pub struct PipelineFacade {
    html_service: Box<dyn HtmlServiceTrait>,
    dispatch: TransformDispatch,
}

impl PipelineFacade {
    pub fn new(html_service: Box<dyn HtmlServiceTrait>, dispatch: TransformDispatch) -> Self {
        PipelineFacade {
            html_service,
            dispatch,
        }
    }

    /// 以指定時間命名輸出目錄並執行流程
    pub fn run_at(&self, config: AppConfig, now: DateTime<Local>) -> io::Result<PipelineOutput> {
        if !config.input.exists() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("輸入路徑 '{}' 不存在", config.input.display()),
            ));
        }
        let input = config.input.canonicalize()?;
        let input_root = if input.is_dir() {
            input.clone()
        } else {
            input.parent().map(PathBuf::from).unwrap_or_else(|| input.clone())
        };

        let output_root = create_output_root(&input, now)?;
        info!("輸入路徑：{}", input.display());
        info!("輸出目錄：{}", output_root.display());

        // 單一檔案輸入時輸出目錄位於輸入根目錄內，走訪時必須排除
        let exclude = output_root.starts_with(&input_root).then(|| output_root.clone());

        let baseline = copy_all_assets(&input_root, &output_root, exclude.as_deref())?;
        info!("已複製 {} 個檔案作為基準", baseline);

        let mut ctx = PipelineContext::new(
            input.clone(),
            input_root.clone(),
            output_root.clone(),
            config.structure,
            config.minify_css,
        );
        let mut out = PipelineOutput {
            output_root: output_root.clone(),
            ..PipelineOutput::default()
        };

        let html_files = html_files_or_single(&input, exclude.as_deref())?;
        info!("正在處理 {} 個 HTML 檔案", html_files.len());
        let pm = ProgressManager::new(html_files.len() as u64, config.no_progress);
        for html_path in html_files {
            pm.advance(html_path.display().to_string());
            if let Err(e) = self.process_html(html_path.clone(), &mut ctx, &mut out) {
                error!("處理 HTML {} 失敗: {}", html_path.display(), e);
                out.failures += 1;
            }
        }
        pm.finish("HTML 處理完成");

        self.copy_static_assets(&ctx, exclude.as_deref(), &mut out)?;
        info!(
            "所有檔案處理完成：HTML {} 個，JS {} 個，CSS {} 個，靜態資源 {} 個，失敗 {} 個",
            out.html_written, out.scripts_obfuscated, out.styles_minified, out.assets_copied, out.failures
        );
        Ok(out)
    }

    fn process_html(&self, html_path: PathBuf, ctx: &mut PipelineContext, out: &mut PipelineOutput) -> io::Result<()> {
        let input = read_html_input(html_path.clone())?;
        let rewritten = self.html_service.rewrite(input, ctx)?;

        out.scripts_obfuscated += rewritten.scripts_obfuscated;
        out.styles_minified += rewritten.styles_minified;
        out.failures += rewritten.failures;
        for asset in rewritten.handled {
            ctx.handled.insert(asset);
        }

        write_file(&rewritten.output_path, rewritten.html.as_bytes())?;
        ctx.handled.insert(html_path);
        out.html_written += 1;
        info!("已儲存 HTML：{}", rewritten.output_path.display());
        Ok(())
    }

    /// 複製未處理的靜態資源；html/htm/js/css 不在此步驟複製
    fn copy_static_assets(
        &self,
        ctx: &PipelineContext,
        exclude: Option<&Path>,
        out: &mut PipelineOutput,
    ) -> io::Result<()> {
        for file in walk_files(&ctx.input_root, exclude)? {
            let role = FileRole::from_path(&file);
            if ctx.handled.contains(&file) || !role.is_fallback_copied() {
                continue;
            }
            let Some(target) = ctx.mapper.mirror(&file) else {
                continue;
            };
            let copied = self
                .dispatch
                .transform_file(&file, role.into())
                .map_err(io::Error::from)
                .and_then(|data| write_file(&target, &data));
            match copied {
                Ok(()) => {
                    info!("複製靜態資源：{}", target.display());
                    out.assets_copied += 1;
                }
                Err(e) => {
                    warn!("複製靜態資源 {} 失敗: {}", file.display(), e);
                    out.failures += 1;
                }
            }
        }
        Ok(())
    }
}

impl Default for PipelineFacade {
    fn default() -> Self {
        PipelineFacade::new(Box::new(HtmlService::default()), TransformDispatch::default())
    }
}

impl PipelineFacadeTrait for PipelineFacade {
    fn run(&self, config: AppConfig) -> io::Result<PipelineOutput> {
        self.run_at(config, Local::now())
    }
}

impl PipelinePort for PipelineFacade {
    fn execute(&self, config: AppConfig) -> io::Result<PipelineOutput> {
        self.run(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::path_map::StructureMode;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn static_assets_pass_through_untouched() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().canonicalize().unwrap().join("site");
        fs::create_dir_all(root.join("img")).unwrap();
        let icon = vec![0u8, 159, 146, 150, 255];
        fs::write(root.join("img/icon.ico"), &icon).unwrap();
        fs::write(root.join("notes.txt"), "handled already").unwrap();
        fs::write(root.join("app.js"), "var a = 1;").unwrap();

        let output = root.parent().unwrap().join("site_out");
        let mut ctx = PipelineContext::new(root.clone(), root.clone(), output.clone(), StructureMode::Flatten, true);
        ctx.handled.insert(root.join("notes.txt"));
        let mut out = PipelineOutput::default();

        PipelineFacade::default()
            .copy_static_assets(&ctx, None, &mut out)
            .unwrap();

        assert_eq!(fs::read(output.join("img/icon.ico")).unwrap(), icon);
        assert!(!output.join("notes.txt").exists());
        assert!(!output.join("app.js").exists());
        assert_eq!(out.assets_copied, 1);
        assert_eq!(out.failures, 0);
    }
}
