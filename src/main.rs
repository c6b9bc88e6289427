use std::io;

use html_obfuscator::action::cli::process_cli_mode;

fn main() -> io::Result<()> {
    let output = process_cli_mode()?;
    log::info!("程式執行完成，輸出目錄：{}", output.output_root.display());
    println!("處理完成！輸出檔案位於：{}", output.output_root.display());
    Ok(())
}
