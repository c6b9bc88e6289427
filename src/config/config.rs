use clap::{ArgAction, Parser};
use std::io;
use std::path::Path;

#[derive(Parser, Clone, Debug)]
#[command(
    name = "html_obfuscator",
    about = "混淆 HTML 網站中的 JS 並壓縮 CSS",
    long_about = "走訪 HTML 檔案或目錄，混淆外部與內嵌的 JavaScript、壓縮外部與內嵌的 CSS，改寫引用路徑，並將其餘資源複製到與輸入同層、帶時間戳記的輸出目錄。\n使用 `--keep-structure=false` 將輸出攤平到單一目錄（檔名加上 obf_ / min_ 前綴）。"
)]
pub struct Cli {
    /// 輸入的 HTML 檔案或目錄
    pub input: Option<String>,
    /// 保留原始目錄結構（false 時攤平輸出）
    #[arg(long, default_value_t = true, action = ArgAction::Set, num_args = 0..=1, default_missing_value = "true")]
    pub keep_structure: bool,
    /// 壓縮外部與內嵌 CSS
    #[arg(long, default_value_t = true, action = ArgAction::Set, num_args = 0..=1, default_missing_value = "true")]
    pub minify_css: bool,
    #[arg(long, default_value = "info", value_parser = ["debug", "info", "warn", "error"])]
    pub log_level: String,
    #[arg(long, default_value_t = false)]
    pub no_progress: bool,
}

#[derive(Parser, Clone, Debug)]
#[command(
    name = "fingerprint",
    about = "就地修改目錄中的檔案以改變其校驗和",
    long_about = "遞迴走訪目錄：圖片寫入隨機 EXIF 註解（需要 exiftool），可加註解的文字檔在開頭插入隨機註解，其餘檔案在結尾附加空白。\n注意：檔案會被直接覆寫，不會建立備份。"
)]
pub struct FingerprintCli {
    /// 目標目錄，預設為目前工作目錄
    pub target: Option<String>,
    /// 不略過 node_modules、.git 等建置／相依目錄
    #[arg(long, default_value_t = false)]
    pub no_ignore: bool,
    #[arg(long, default_value = "info", value_parser = ["debug", "info", "warn", "error"])]
    pub log_level: String,
    #[arg(long, default_value_t = false)]
    pub no_progress: bool,
}

pub fn validate_input_path(input: Option<&str>) -> io::Result<&Path> {
    let Some(input) = input.filter(|s| !s.trim().is_empty()) else {
        log::error!("未提供輸入路徑");
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "請輸入有效的檔案路徑或目錄路徑",
        ));
    };
    let path = Path::new(input);
    if !path.exists() {
        log::error!("輸入路徑不存在：{}", input);
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("輸入路徑 '{}' 不存在", input),
        ));
    }
    Ok(path)
}

pub fn validate_target_dir(target: &Path) -> io::Result<()> {
    if !target.is_dir() {
        log::error!("目錄不存在：{}", target.display());
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("目錄 '{}' 不存在", target.display()),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boolean_flags_default_to_true() {
        let cli = Cli::parse_from(["html_obfuscator", "site"]);
        assert_eq!(cli.input.as_deref(), Some("site"));
        assert!(cli.keep_structure);
        assert!(cli.minify_css);
    }

    #[test]
    fn boolean_flags_accept_explicit_false() {
        let cli = Cli::parse_from([
            "html_obfuscator",
            "site",
            "--keep-structure=false",
            "--minify-css",
            "false",
        ]);
        assert!(!cli.keep_structure);
        assert!(!cli.minify_css);
    }

    #[test]
    fn missing_input_is_rejected() {
        let err = validate_input_path(None).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);

        let err = validate_input_path(Some("/definitely/not/here/site")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn fingerprint_target_is_optional() {
        let cli = FingerprintCli::parse_from(["fingerprint"]);
        assert!(cli.target.is_none());
        assert!(!cli.no_ignore);
    }
}
