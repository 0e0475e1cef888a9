use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for operations that can produce FindError
pub type FindResult<T> = Result<T, FindError>;

/// rfind 的自定义错误类型
///
/// 显示文本沿用 find 的习惯写法，例如 `'dir': No such file or directory`。
#[derive(Debug, Error)]
pub enum FindError {
    /// 文件未找到
    #[error("'{}': No such file or directory", .0.display())]
    FileNotFound(PathBuf),

    /// 路径带有结尾分隔符，但指向的不是目录
    #[error("'{}': Not a directory", .0.display())]
    NotADirectory(PathBuf),

    /// 权限不足
    #[error("'{}': Permission denied", .0.display())]
    PermissionDenied(PathBuf),

    /// 目录无法打开或读取
    #[error("'{}': {source}", .path.display())]
    DirectoryUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// 文件系统错误（其他IO错误）
    #[error("'{}': {source}", .path.display())]
    FilesystemError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// 遍历目录时的错误
    #[error("directory traversal error: {0}")]
    WalkDirError(String),

    /// 模式匹配错误
    #[error("invalid pattern '{pattern}': {message}")]
    PatternError { pattern: String, message: String },

    /// 无效的文件类型
    #[error("unknown argument to -type: {0}")]
    InvalidFileType(String),

    /// 选项参数无效
    #[error("invalid argument `{value}' to `{option}'")]
    InvalidArgument { option: String, value: String },

    /// 选项缺少参数
    #[error("missing argument to `{0}'")]
    MissingArgument(String),

    /// 无法识别的谓词
    #[error("unknown predicate `{0}'")]
    UnknownPredicate(String),

    /// 表达式之后出现了路径
    #[error("paths must precede expression: `{0}'")]
    PathAfterExpression(String),

    /// 写出结果失败
    #[error("error writing output: {0}")]
    Output(#[source] io::Error),
}

impl FindError {
    /// 将 IO 错误按类型映射为对应的错误变体
    pub fn from_io(err: io::Error, path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        match err.kind() {
            io::ErrorKind::NotFound => FindError::FileNotFound(path),
            io::ErrorKind::PermissionDenied => FindError::PermissionDenied(path),
            _ => FindError::FilesystemError { path, source: err },
        }
    }

    /// 是否必须终止整个查找
    ///
    /// 参数错误和输出错误是致命的；单个路径或子树的错误只需报告后继续。
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            FindError::FileNotFound(_)
                | FindError::NotADirectory(_)
                | FindError::PermissionDenied(_)
                | FindError::DirectoryUnreadable { .. }
                | FindError::FilesystemError { .. }
                | FindError::WalkDirError(_)
        )
    }
}

impl From<walkdir::Error> for FindError {
    fn from(err: walkdir::Error) -> Self {
        let path = err.path().map(Path::to_path_buf).unwrap_or_default();
        let message = err.to_string();
        match err.into_io_error() {
            Some(source) => FindError::DirectoryUnreadable { path, source },
            None => FindError::WalkDirError(message),
        }
    }
}
