//! find 工具的命令行接口
//!
//! 本模块提供了命令行参数解析：clap 负责 `-L`、`--debug` 等开关，
//! 其余参数（起始路径和表达式）原样交给表达式解析器，生成查询描述。

use std::ffi::OsString;

use clap::Parser;

use crate::errors::{FindError, FindResult};
use crate::finder::filter::{AgeFilter, ExecFilter, NameFilter, TypeFilter};
use crate::finder::options::{PredicateKind, QueryDescriptor, RootSpec};

/// 默认的起始路径
pub const DEFAULT_ROOT: &str = ".";

/// find 风格的文件查找工具
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// 跟随符号链接
    #[arg(short = 'L')]
    pub follow_links: bool,

    /// 启用调试日志
    #[arg(long)]
    pub debug: bool,

    /// 起始路径（默认：当前目录），后接表达式：
    /// -name PATTERN, -mtime N, -type LIST, -exec COMMAND ;, -print
    #[arg(value_name = "PATH|EXPR", trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<OsString>,
}

impl Cli {
    /// 构建查询描述
    pub fn build_query(&self) -> FindResult<QueryDescriptor> {
        parse_expression(&self.args, self.follow_links)
    }
}

/// 将起始路径和表达式解析为查询描述
///
/// 以 `-` 开头之前的参数都是起始路径；之后出现的路径视为错误。
/// 同一谓词重复出现时，每次都会加入谓词链，参数以最后一次为准。
pub fn parse_expression(args: &[OsString], follow_links: bool) -> FindResult<QueryDescriptor> {
    let mut query = QueryDescriptor::new().with_follow_links(follow_links);
    let mut tokens = args.iter();
    let mut in_expression = false;

    while let Some(token) = tokens.next() {
        let option = match token.to_str() {
            Some(text) if text.starts_with('-') => text,
            _ => {
                if in_expression {
                    return Err(FindError::PathAfterExpression(token.to_string_lossy().into_owned()));
                }
                query.roots.push(RootSpec::new(token.clone()));
                continue;
            }
        };
        in_expression = true;

        match option {
            "-L" => query.follow_links = true,
            "-name" => {
                let pattern = option_value(option, tokens.next())?;
                query.name = Some(NameFilter::new(pattern)?);
                query.predicates.push(PredicateKind::Name);
            }
            "-mtime" => {
                let days = option_value(option, tokens.next())?;
                query.age = Some(AgeFilter::new(parse_days(option, days)?));
                query.predicates.push(PredicateKind::Age);
            }
            "-type" => {
                let list = option_value(option, tokens.next())?;
                query.types = TypeFilter::parse(list)?;
                query.predicates.push(PredicateKind::Type);
            }
            "-exec" => {
                let mut command = Vec::new();
                let mut terminated = false;
                for token in tokens.by_ref() {
                    if token == ";" {
                        terminated = true;
                        break;
                    }
                    command.push(option_value(option, Some(token))?);
                }
                if !terminated || command.is_empty() {
                    return Err(FindError::MissingArgument(option.to_string()));
                }
                query.exec = Some(ExecFilter::from_tokens(&command));
                query.predicates.push(PredicateKind::Exec);
            }
            "-print" => {
                query.explicit_print = true;
                query.predicates.push(PredicateKind::Print);
            }
            _ => return Err(FindError::UnknownPredicate(option.to_string())),
        }
    }

    if query.roots.is_empty() {
        query.roots.push(RootSpec::new(DEFAULT_ROOT));
    }
    Ok(query)
}

/// 取出选项参数，要求为合法 UTF-8
fn option_value<'a>(option: &str, value: Option<&'a OsString>) -> FindResult<&'a str> {
    let value = value.ok_or_else(|| FindError::MissingArgument(option.to_string()))?;
    value.to_str().ok_or_else(|| FindError::InvalidArgument {
        option: option.to_string(),
        value: value.to_string_lossy().into_owned(),
    })
}

/// 天数只接受纯数字，不支持 `+N`/`-N`
fn parse_days(option: &str, value: &str) -> FindResult<u64> {
    let invalid = || FindError::InvalidArgument {
        option: option.to_string(),
        value: value.to_string(),
    };
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    value.parse().map_err(|_| invalid())
}
