use std::path::PathBuf;
use thiserror::Error;

/// 指令识别相关错误
///
/// 未匹配不是错误，`lookup` 会返回 `MatchMode::Unrecognized`。
#[derive(Debug, Error)]
pub enum MatcherError {
    /// 匹配器尚未构建就发起查询
    #[error("指令匹配器尚未就绪，请先构建指令索引")]
    NotReady,

    #[error("读写文件失败 {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("解析配置失败 {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("序列化配置失败: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    /// 数据集某一行不是 `输入\t期望值` 两列
    #[error("{path}:{line}: 预期有 2 列 TSV 数据 (输入\\t期望值)，但得到 {columns} 列")]
    Dataset {
        path: PathBuf,
        line: usize,
        columns: usize,
    },
}

impl MatcherError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        MatcherError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, MatcherError>;
