//! script、style、textarea、title 的內容在 HTML 中是原始文字，但 tl 會把其中的 `<`
//! 當成標籤解析。解析前先把這些元素的內容換成佔位字串，改寫完成後再放回。

use crate::utils::utils::generate_random_string;

const RAW_TEXT_ELEMENTS: [&str; 4] = ["script", "style", "textarea", "title"];
const TOKEN_LEN: usize = 16;

/// 從文件中取出的原始文字區塊
#[derive(Debug)]
pub struct RawTextBlocks {
    token: String,
    bodies: Vec<String>,
}

impl RawTextBlocks {
    /// 回傳遮蔽後的文件與取出的區塊
    pub fn extract(source: &str) -> (String, RawTextBlocks) {
        let mut token = format!("rawtext{}", generate_random_string(TOKEN_LEN));
        while source.contains(&token) {
            token = format!("rawtext{}", generate_random_string(TOKEN_LEN));
        }
        let mut blocks = RawTextBlocks {
            token,
            bodies: Vec::new(),
        };

        // 小寫化不改變位元組長度，索引可直接用在原文上
        let lower = source.to_ascii_lowercase();
        let mut masked = String::with_capacity(source.len());
        let mut copied = 0;
        let mut pos = 0;

        while let Some(offset) = lower[pos..].find('<') {
            let start = pos + offset;
            let rest = &lower[start..];
            if rest.starts_with("<!--") {
                pos = rest.find("-->").map_or(lower.len(), |end| start + end + 3);
                continue;
            }
            let Some(name) = RAW_TEXT_ELEMENTS.iter().find(|name| opens_element(rest, name)) else {
                pos = start + 1;
                continue;
            };
            let Some(body_start) = tag_end(&lower, start) else {
                break;
            };
            let body_end = find_close(&lower, body_start, name).unwrap_or(lower.len());

            masked.push_str(&source[copied..body_start]);
            if body_end > body_start {
                masked.push_str(&blocks.placeholder(blocks.bodies.len()));
                blocks.bodies.push(source[body_start..body_end].to_string());
            }
            copied = body_end;
            pos = body_end;
        }
        masked.push_str(&source[copied..]);
        (masked, blocks)
    }

    fn placeholder(&self, index: usize) -> String {
        format!("{}-{}-", self.token, index)
    }

    /// 文字節點若正好是佔位字串，回傳區塊編號
    pub fn index_of(&self, text: &str) -> Option<usize> {
        let rest = text.strip_prefix(self.token.as_str())?.strip_prefix('-')?;
        let index: usize = rest.strip_suffix('-')?.parse().ok()?;
        (index < self.bodies.len()).then_some(index)
    }

    pub fn body(&self, index: usize) -> Option<&str> {
        self.bodies.get(index).map(String::as_str)
    }

    pub fn replace(&mut self, index: usize, body: String) -> bool {
        match self.bodies.get_mut(index) {
            Some(slot) => {
                *slot = body;
                true
            }
            None => false,
        }
    }

    /// 把佔位字串換回區塊內容
    pub fn restore(&self, masked: &str) -> String {
        let mut html = masked.to_string();
        for (index, body) in self.bodies.iter().enumerate() {
            html = html.replacen(&self.placeholder(index), body, 1);
        }
        html
    }
}

/// `<name` 後面必須接空白、`>` 或 `/`
fn opens_element(rest: &str, name: &str) -> bool {
    let Some(after) = rest.strip_prefix('<').and_then(|r| r.strip_prefix(name)) else {
        return false;
    };
    matches!(after.bytes().next(), Some(b) if b.is_ascii_whitespace() || b == b'>' || b == b'/')
}

/// 開始標籤結束位置（`>` 之後），略過引號內的 `>`
fn tag_end(lower: &str, start: usize) -> Option<usize> {
    let mut quote: Option<u8> = None;
    for (i, b) in lower.bytes().enumerate().skip(start + 1) {
        match quote {
            Some(q) if b == q => quote = None,
            Some(_) => {}
            None if b == b'"' || b == b'\'' => quote = Some(b),
            None if b == b'>' => return Some(i + 1),
            None => {}
        }
    }
    None
}

fn find_close(lower: &str, from: usize, name: &str) -> Option<usize> {
    let pattern = format!("</{}", name);
    let mut pos = from;
    while let Some(offset) = lower[pos..].find(&pattern) {
        let start = pos + offset;
        let next = lower.as_bytes().get(start + pattern.len()).copied();
        match next {
            None => return Some(start),
            Some(b) if b.is_ascii_whitespace() || b == b'>' || b == b'/' => return Some(start),
            _ => pos = start + pattern.len(),
        }
    }
    None
}
