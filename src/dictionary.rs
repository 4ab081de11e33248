use std::fs;
use std::path::Path;

use crate::error::{MatcherError, Result};

/// 从文本中逐行读取指令，每一行表示一条合法指令
pub fn parse_commands(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// 从指令文件加载词典
pub fn load_commands_from_file(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path).map_err(|e| MatcherError::io(path, e))?;
    let commands = parse_commands(&content);
    log::info!("已从 {} 加载 {} 条指令", path.display(), commands.len());
    Ok(commands)
}
