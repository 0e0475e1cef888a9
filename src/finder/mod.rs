//! 文件查找模块
//!
//! 这个模块提供了文件系统遍历和谓词求值功能：对每个起始路径做深度优先遍历，
//! 并对遇到的每个条目按顺序执行谓词/动作链。

pub mod entry;
pub mod evaluator;
pub mod filter;
pub mod format;
pub mod options;
pub mod path;
pub mod walker;

use std::io::Write;

use log::{debug, info};

use crate::errors::{FindError, FindResult};

pub use self::entry::{FileEntry, FileKind};
pub use self::evaluator::{Evaluator, Verdict};
pub use self::filter::FileFilter;
pub use self::format::format_for_print;
pub use self::options::{PredicateKind, QueryDescriptor, RootSpec};
pub use self::walker::FileWalker;

/// 一次查找的统计结果
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FindSummary {
    /// 已报告的非致命错误数量（缺失的起始路径、无法打开的目录）
    pub errors: usize,
}

/// 文件查找器
///
/// 持有只读的查询描述，按顺序处理每个起始路径。
#[derive(Debug)]
pub struct Finder {
    query: QueryDescriptor,
}

impl Finder {
    /// 创建新的文件查找器实例
    pub fn new(query: QueryDescriptor) -> Self {
        Self { query }
    }

    pub fn query(&self) -> &QueryDescriptor {
        &self.query
    }

    /// 依次处理所有起始路径，将结果写入 `out`
    ///
    /// 某个起始路径出错时只报告该路径，其余路径照常处理；
    /// 只有致命错误（如输出失败）才会提前返回。
    pub fn run<W: Write>(&self, out: &mut W) -> FindResult<FindSummary> {
        let mut walker = FileWalker::new(Evaluator::new(&self.query));

        info!("Starting search over {} root(s)", self.query.roots.len());
        for root in &self.query.roots {
            debug!("在路径中搜索: {}", root.original().to_string_lossy());
            match FileEntry::from_root(root, self.query.follow_links) {
                Ok(entry) if entry.is_dir() => walker.walk(entry, out)?,
                Ok(entry) => walker.visit(&entry, out)?,
                Err(err) if err.is_fatal() => return Err(err),
                Err(err) => walker.report(err),
            }
        }

        out.flush().map_err(FindError::Output)?;
        Ok(FindSummary {
            errors: walker.error_count(),
        })
    }
}
