//! 文件系统遍历功能
//!
//! 深度优先、先序的递归遍历：每个目录先被求值，再进入其子项。
//! 子项按平台返回的目录顺序访问，不做排序。

use std::ffi::{OsStr, OsString};
use std::io::Write;
use std::path::Path;

use log::{debug, warn};
use walkdir::WalkDir;

use crate::errors::{FindError, FindResult};
use super::entry::{probe, FileEntry};
use super::evaluator::Evaluator;
use super::path;

/// 按给定查询遍历目录树
pub struct FileWalker<'a> {
    evaluator: Evaluator<'a>,
    follow_links: bool,
    errors: usize,
}

impl<'a> FileWalker<'a> {
    /// 使用给定的求值器创建新的 FileWalker
    pub fn new(evaluator: Evaluator<'a>) -> Self {
        Self {
            follow_links: evaluator.query().follow_links,
            evaluator,
            errors: 0,
        }
    }

    /// 已报告的非致命错误数量
    pub fn error_count(&self) -> usize {
        self.errors
    }

    /// 对单个非目录条目求值
    pub fn visit<W: Write>(&mut self, entry: &FileEntry, out: &mut W) -> FindResult<()> {
        let verdict = self.evaluator.evaluate(entry, out)?;
        debug!("{}: {:?}", entry.path().to_string_lossy(), verdict);
        Ok(())
    }

    /// 先对目录本身求值，再递归处理其子项
    ///
    /// 只有输出错误会向上传播；无法打开的目录会被报告并跳过。
    pub fn walk<W: Write>(&mut self, dir: FileEntry, out: &mut W) -> FindResult<()> {
        self.visit(&dir, out)?;

        // 只列出一层，递归由我们自己控制
        let listing = WalkDir::new(dir.path())
            .min_depth(1)
            .max_depth(1)
            .follow_links(false);

        for item in listing {
            let name = match item {
                Ok(child) => child.file_name().to_os_string(),
                Err(err) if err.depth() == 0 => {
                    self.report(err.into());
                    return Ok(());
                }
                Err(err) => {
                    let name = err.path().and_then(Path::file_name).map(OsStr::to_os_string);
                    match name {
                        Some(name) => name,
                        None => {
                            self.report(err.into());
                            continue;
                        }
                    }
                }
            };
            self.walk_child(dir.path(), name, out)?;
        }

        Ok(())
    }

    /// 构造子条目，按符号链接设置获取元数据，然后递归或直接求值
    fn walk_child<W: Write>(&mut self, parent: &OsStr, name: OsString, out: &mut W) -> FindResult<()> {
        let child_path = path::join(parent, &name);
        let metadata = match probe(&child_path, self.follow_links) {
            Ok(metadata) => Some(metadata),
            Err(err) => {
                // 元数据缺失时按非目录处理
                warn!("Unable to get file status: {}", err);
                None
            }
        };

        let child = FileEntry::new(child_path, name, metadata);
        if child.is_dir() {
            self.walk(child.into_directory(), out)
        } else {
            self.visit(&child, out)
        }
    }

    /// 报告非致命错误，遍历继续
    pub fn report(&mut self, err: FindError) {
        self.errors += 1;
        eprintln!("{}: {}", env!("CARGO_PKG_NAME"), err);
    }
}
