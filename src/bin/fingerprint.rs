use std::io;

use html_obfuscator::action::fingerprint::process_fingerprint_mode;

fn main() -> io::Result<()> {
    let output = process_fingerprint_mode()?;
    println!(
        "全部完成。已修改 {} 個文字檔、{} 張圖片",
        output.text_modified, output.images_modified
    );
    Ok(())
}
