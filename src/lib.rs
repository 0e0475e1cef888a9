//! 用于查找文件和目录的库
//!
//! 本库实现了 find 风格的查找：从若干起始路径出发做深度优先遍历，
//! 对每个条目按命令行顺序执行谓词/动作链：
//! - `-name`：按文件名通配符匹配
//! - `-mtime`：按修改时间所在的天数区间匹配
//! - `-type`：按文件类型匹配
//! - `-exec`：对每个条目执行命令，以退出状态作为匹配结果
//! - `-print`：输出路径
//!
//! 链中任一谓词不匹配即停止求值。未显式给出 `-print` 时，
//! 除非给出了 `-exec`，否则默认输出匹配的条目。
//!
//! # 示例
//!
//! 基本用法：
//! ```no_run
//! use rfind::finder::{Finder, QueryDescriptor};
//!
//! // 创建查询：在 src/ 下查找 Rust 源文件
//! let query = QueryDescriptor::new()
//!     .with_root("src/")
//!     .with_name("*.rs")
//!     .unwrap()
//!     .with_follow_links(false); // 不跟随符号链接
//!
//! // 执行查找，结果写到标准输出
//! let finder = Finder::new(query);
//! let summary = finder.run(&mut std::io::stdout().lock()).unwrap();
//! println!("错误数: {}", summary.errors);
//! ```
//!
//! 更多用法请参考各模块文档。

pub mod cli;
pub mod errors;
pub mod finder;

// Re-export main types for convenience
pub use errors::{FindError, FindResult};
pub use finder::{Finder, FindSummary, QueryDescriptor};
