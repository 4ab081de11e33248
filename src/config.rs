use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::dataset::DatasetKind;
use crate::dictionary::load_commands_from_file;
use crate::error::{MatcherError, Result};

/// 应用配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub dictionary: DictionaryConfig,
    #[serde(default)]
    pub matcher: MatcherConfig,
    #[serde(default)]
    pub evaluation: EvaluationConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DictionaryConfig {
    /// 指令文件，每行一条指令
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commands_file: Option<PathBuf>,
    /// 直接写在配置里的指令，排在指令文件之后
    #[serde(default)]
    pub commands: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatcherConfig {
    /// 是否启用长度剪枝
    #[serde(default = "default_length_check")]
    pub length_check: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationConfig {
    /// TSV 测试集
    #[serde(default = "default_datasets")]
    pub datasets: Vec<PathBuf>,
    /// 每个测试集打印多少个失败用例
    #[serde(default = "default_show_failures")]
    pub show_failures: usize,
}

fn default_length_check() -> bool {
    true
}
fn default_datasets() -> Vec<PathBuf> {
    DatasetKind::ALL
        .iter()
        .map(|kind| Path::new("test_dataset").join(kind.file_name()))
        .collect()
}
fn default_show_failures() -> usize {
    20
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            length_check: default_length_check(),
        }
    }
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            datasets: default_datasets(),
            show_failures: default_show_failures(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        default_config()
    }
}

impl AppConfig {
    /// 实际生效的词典：指令文件在前，配置内指令在后
    pub fn commands(&self) -> Result<Vec<String>> {
        let mut commands = match &self.dictionary.commands_file {
            Some(path) => load_commands_from_file(path)?,
            None => Vec::new(),
        };
        commands.extend(self.dictionary.commands.iter().cloned());
        Ok(commands)
    }
}

/// 获取配置文件路径
pub fn config_path() -> PathBuf {
    let config_dir = dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("logene-voice-command");
    config_dir.join("config.toml")
}

/// 加载配置，文件不存在则创建默认配置
pub fn load_config() -> Result<AppConfig> {
    load_config_from(&config_path())
}

/// 从指定路径加载配置，文件不存在则在该路径写入默认配置
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    if path.exists() {
        let content = fs::read_to_string(path).map_err(|e| MatcherError::io(path, e))?;
        let config = toml::from_str(&content).map_err(|e| MatcherError::ConfigParse {
            path: path.to_path_buf(),
            source: e,
        })?;
        log::info!("已加载配置 {}", path.display());
        Ok(config)
    } else {
        let config = default_config();
        save_config_to(&config, path)?;
        log::info!("配置不存在，已创建默认配置 {}", path.display());
        Ok(config)
    }
}

/// 保存配置到文件
pub fn save_config_to(config: &AppConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| MatcherError::io(parent, e))?;
    }
    let content = toml::to_string_pretty(config)?;
    fs::write(path, content).map_err(|e| MatcherError::io(path, e))?;
    Ok(())
}

/// 默认配置
fn default_config() -> AppConfig {
    let commands = [
        "打开空调",
        "关闭空调",
        "打开窗户",
        "关闭窗户",
        "打开电视",
        "关闭电视",
        "打开台灯",
        "关闭台灯",
        "打开窗帘",
        "关闭窗帘",
        "启动扫地机",
        "停用扫地机",
        "打开热水器",
        "关闭热水器",
    ];

    AppConfig {
        dictionary: DictionaryConfig {
            commands_file: None,
            commands: commands.iter().map(|c| c.to_string()).collect(),
        },
        matcher: MatcherConfig::default(),
        evaluation: EvaluationConfig::default(),
    }
}
