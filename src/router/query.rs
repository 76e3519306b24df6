//! 查询串编解码
//!
//! 小程序导航参数的线上格式是 URL 风格的查询串：`&` 连接的
//! `key=value` 对，键值百分号编码。重复键编码数组值；对象值先
//! JSON 序列化再整体编码，读取时再解析回来。
//!
//! 三个入口：
//! - [`parse_query`]：解析路径中携带的查询串
//! - [`stringify_query`]：序列化导航参数（不带前导 `?`）
//! - [`parse_query_obj`]：从宿主回报的原始参数表做尽力还原

use serde::Serialize;
use serde_json::Value;
use std::borrow::Cow;
use std::collections::BTreeMap;

/// 查询参数表
///
/// 键有序，保证同一组参数序列化结果确定。
pub type QueryMap = BTreeMap<String, QueryValue>;

/// 查询参数值
///
/// 覆盖线上格式允许的全部取值形态。
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum QueryValue {
    /// 无值键（`?a` 解析结果；序列化为裸键）
    Null,
    /// 普通字符串值
    Text(String),
    /// 重复键累积出的数组值；`None` 元素序列化为裸键
    List(Vec<Option<String>>),
    /// JSON 对象值（序列化时 JSON 字符串化后整体编码）
    Object(Value),
    /// 缺省占位：序列化时整对跳过
    Omitted,
}

impl QueryValue {
    /// 是否为缺省占位
    pub fn is_omitted(&self) -> bool {
        matches!(self, QueryValue::Omitted)
    }
}

impl From<&str> for QueryValue {
    fn from(s: &str) -> Self {
        QueryValue::Text(s.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(s: String) -> Self {
        QueryValue::Text(s)
    }
}

impl From<Vec<String>> for QueryValue {
    fn from(list: Vec<String>) -> Self {
        QueryValue::List(list.into_iter().map(Some).collect())
    }
}

impl From<Value> for QueryValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => QueryValue::Null,
            Value::String(s) => QueryValue::Text(s),
            other => QueryValue::Object(other),
        }
    }
}

/// 会覆盖继承属性的键名，解析时静默丢弃
///
/// 对应宿主脚本环境里 `Object.prototype` 自带的属性名。
const FORBIDDEN_KEYS: &[&str] = &[
    "__proto__",
    "constructor",
    "hasOwnProperty",
    "isPrototypeOf",
    "propertyIsEnumerable",
    "toLocaleString",
    "toString",
    "valueOf",
];

/// 解析查询串为参数表
///
/// 接受带或不带前导 `?` 的查询串。空串和 `"?"` 返回空表。
/// 每对先把 `+` 预解码为空格，再按第一个 `=` 切分；无值对解析为
/// [`QueryValue::Null`]；重复键按出现顺序累积成数组。
///
/// # Example
///
/// ```
/// use mina_router::router::query::{parse_query, QueryValue};
///
/// let query = parse_query("a=1&b=2&b=3");
/// assert_eq!(query["a"], QueryValue::Text("1".into()));
/// assert_eq!(
///     query["b"],
///     QueryValue::List(vec![Some("2".into()), Some("3".into())])
/// );
/// ```
pub fn parse_query(search: &str) -> QueryMap {
    let mut query = QueryMap::new();
    if search.is_empty() || search == "?" {
        return query;
    }

    let search = search.strip_prefix('?').unwrap_or(search);
    for pair in search.split('&') {
        if pair.is_empty() {
            continue;
        }

        // 先把 + 预解码为空格，再切分
        let pair = pair.replace('+', " ");
        let (raw_key, raw_value) = match pair.find('=') {
            // 允许值里出现 = 字符
            Some(pos) => (&pair[..pos], Some(&pair[pos + 1..])),
            None => (pair.as_str(), None),
        };

        let key = decode(raw_key).into_owned();
        if FORBIDDEN_KEYS.contains(&key.as_str()) {
            continue;
        }

        let value = raw_value.map(|v| decode(v).into_owned());

        match query.entry(key) {
            std::collections::btree_map::Entry::Occupied(mut occupied) => {
                match occupied.get_mut() {
                    QueryValue::List(list) => list.push(value),
                    existing => {
                        let first = match existing {
                            QueryValue::Null => None,
                            QueryValue::Text(t) => Some(std::mem::take(t)),
                            // parse_query 不产生其余变体
                            _ => None,
                        };
                        *existing = QueryValue::List(vec![first, value]);
                    }
                }
            }
            std::collections::btree_map::Entry::Vacant(vacant) => {
                vacant.insert(match value {
                    Some(v) => QueryValue::Text(v),
                    None => QueryValue::Null,
                });
            }
        }
    }

    query
}

/// 序列化参数表为查询串（不带前导 `?`）
///
/// - [`QueryValue::Null`] 输出裸键
/// - [`QueryValue::Omitted`] 整对跳过
/// - [`QueryValue::List`] 每个元素重复一次键
/// - [`QueryValue::Object`] JSON 字符串化后整体编码
pub fn stringify_query(query: &QueryMap) -> String {
    let mut search = String::new();

    for (key, value) in query {
        if value.is_omitted() {
            continue;
        }
        if !search.is_empty() {
            search.push('&');
        }
        let key = encode_query_key(key);

        match value {
            QueryValue::Null => search.push_str(&key),
            QueryValue::Text(text) => {
                search.push_str(&key);
                search.push('=');
                search.push_str(&encode_query_value(text));
            }
            QueryValue::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        search.push('&');
                    }
                    search.push_str(&key);
                    if let Some(text) = item {
                        search.push('=');
                        search.push_str(&encode_query_value(text));
                    }
                }
            }
            QueryValue::Object(value) => {
                search.push_str(&key);
                search.push('=');
                let json = serde_json::to_string(value).unwrap_or_default();
                search.push_str(&encode_query_value(&json));
            }
            QueryValue::Omitted => unreachable!(),
        }
    }

    search
}

/// 从宿主回报的原始参数表做尽力还原
///
/// 宿主把页面参数以原始字符串表的形式交回。对每个值先解码，再尝试
/// JSON 解析；仅当解析结果是对象时才保留解析值，否则保留解码后的
/// 字符串。空值跳过。
///
/// 只认对象是为了防止纯数字形态的字符串被数值化破坏精度，
/// 例如 18 位证件号 `"230832196807199999"`。
pub fn parse_query_obj(raw: &BTreeMap<String, String>) -> QueryMap {
    let mut result = QueryMap::new();

    for (key, value) in raw {
        if value.is_empty() {
            continue;
        }

        let decoded = decode(value).into_owned();
        match serde_json::from_str::<Value>(&decoded) {
            Ok(parsed) if parsed.is_object() => {
                result.insert(key.clone(), QueryValue::Object(parsed));
            }
            _ => {
                result.insert(key.clone(), QueryValue::Text(decoded));
            }
        }
    }

    result
}

// ============================================================================
// 百分号编解码
// ============================================================================

/// 值位置无须编码的非字母数字字符
const VALUE_SAFE: &[u8] = b"-._~!$'()*,;:@/?=";

/// 键位置无须编码的非字母数字字符（键中的 `=` 必须编码）
const KEY_SAFE: &[u8] = b"-._~!$'()*,;:@/?";

fn encode_with(text: &str, safe: &[u8]) -> String {
    let mut out = String::with_capacity(text.len());
    for &byte in text.as_bytes() {
        if byte.is_ascii_alphanumeric() || safe.contains(&byte) {
            out.push(byte as char);
        } else {
            out.push('%');
            out.push_str(&format!("{byte:02X}"));
        }
    }
    out
}

/// 编码查询键
pub fn encode_query_key(key: &str) -> String {
    encode_with(key, KEY_SAFE)
}

/// 编码查询值
pub fn encode_query_value(value: &str) -> String {
    encode_with(value, VALUE_SAFE)
}

/// 百分号解码
///
/// 非法的 `%XX` 序列原样保留。注意 `+` 不在这里处理，
/// [`parse_query`] 在切分前已把它预解码为空格。
pub fn decode(text: &str) -> Cow<'_, str> {
    if !text.contains('%') {
        return Cow::Borrowed(text);
    }

    let bytes = text.as_bytes();
    let mut result = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'%' if i + 2 < bytes.len() => {
                if let (Some(hi), Some(lo)) = (hex_digit(bytes[i + 1]), hex_digit(bytes[i + 2])) {
                    result.push(hi << 4 | lo);
                    i += 3;
                } else {
                    result.push(b'%');
                    i += 1;
                }
            }
            b => {
                result.push(b);
                i += 1;
            }
        }
    }

    Cow::Owned(String::from_utf8_lossy(&result).into_owned())
}

/// 十六进制字符转数值
fn hex_digit(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn text(s: &str) -> QueryValue {
        QueryValue::Text(s.to_string())
    }

    #[test]
    fn test_parse_empty() {
        assert!(parse_query("").is_empty());
        assert!(parse_query("?").is_empty());
    }

    #[test]
    fn test_parse_basic() {
        let query = parse_query("a=1&b=2");
        assert_eq!(query["a"], text("1"));
        assert_eq!(query["b"], text("2"));
    }

    #[test]
    fn test_parse_leading_question_mark() {
        let query = parse_query("?id=42");
        assert_eq!(query["id"], text("42"));
    }

    #[test]
    fn test_parse_repeated_keys_accumulate_in_order() {
        let query = parse_query("a=1&b=2&b=3");
        assert_eq!(query["a"], text("1"));
        assert_eq!(
            query["b"],
            QueryValue::List(vec![Some("2".to_string()), Some("3".to_string())])
        );
    }

    #[test]
    fn test_parse_bare_key_is_null() {
        let query = parse_query("flag&name=alice");
        assert_eq!(query["flag"], QueryValue::Null);
        assert_eq!(query["name"], text("alice"));
    }

    #[test]
    fn test_parse_plus_predecoded_to_space() {
        let query = parse_query("msg=hello+world");
        assert_eq!(query["msg"], text("hello world"));
    }

    #[test]
    fn test_parse_allows_equals_in_value() {
        let query = parse_query("expr=a=b");
        assert_eq!(query["expr"], text("a=b"));
    }

    #[test]
    fn test_parse_percent_decoding() {
        let query = parse_query("word=caf%C3%A9&data=a%26b");
        assert_eq!(query["word"], text("café"));
        assert_eq!(query["data"], text("a&b"));
    }

    #[test]
    fn test_parse_drops_inherited_keys() {
        let query = parse_query("__proto__=x&toString=y&a=1");
        assert!(!query.contains_key("__proto__"));
        assert!(!query.contains_key("toString"));
        assert_eq!(query["a"], text("1"));
    }

    #[test]
    fn test_parse_skips_empty_segments() {
        let query = parse_query("a=1&&b=2&");
        assert_eq!(query.len(), 2);
    }

    #[test]
    fn test_stringify_null_is_bare_key() {
        let mut query = QueryMap::new();
        query.insert("a".to_string(), QueryValue::Null);
        assert_eq!(stringify_query(&query), "a");
    }

    #[test]
    fn test_stringify_omitted_is_dropped() {
        let mut query = QueryMap::new();
        query.insert("a".to_string(), QueryValue::Omitted);
        assert_eq!(stringify_query(&query), "");

        query.insert("b".to_string(), text("1"));
        assert_eq!(stringify_query(&query), "b=1");
    }

    #[test]
    fn test_stringify_list_repeats_key() {
        let mut query = QueryMap::new();
        query.insert(
            "b".to_string(),
            QueryValue::List(vec![Some("2".to_string()), None, Some("3".to_string())]),
        );
        assert_eq!(stringify_query(&query), "b=2&b&b=3");
    }

    #[test]
    fn test_stringify_object_json_encoded() {
        let mut query = QueryMap::new();
        query.insert("filter".to_string(), QueryValue::Object(json!({"tag": "new"})));
        let search = stringify_query(&query);
        assert_eq!(search, format!("filter={}", encode_query_value("{\"tag\":\"new\"}")));
    }

    #[test]
    fn test_roundtrip_is_set_equivalent() {
        let original = parse_query("a=1&b=2&b=3&flag");
        let reparsed = parse_query(&stringify_query(&original));
        assert_eq!(original, reparsed);
    }

    #[test]
    fn test_parse_query_obj_keeps_numeric_looking_string() {
        let mut raw = BTreeMap::new();
        // 18 位证件号，JSON 数值化会丢失精度
        raw.insert("card".to_string(), "230832196807199999".to_string());
        let parsed = parse_query_obj(&raw);
        assert_eq!(parsed["card"], text("230832196807199999"));
    }

    #[test]
    fn test_parse_query_obj_restores_object() {
        let json_text = "{\"tag\":\"new\",\"page\":2}";
        let mut raw = BTreeMap::new();
        raw.insert("filter".to_string(), encode_query_value(json_text));
        let parsed = parse_query_obj(&raw);
        assert_eq!(
            parsed["filter"],
            QueryValue::Object(json!({"tag": "new", "page": 2}))
        );
    }

    #[test]
    fn test_parse_query_obj_skips_empty_values() {
        let mut raw = BTreeMap::new();
        raw.insert("empty".to_string(), String::new());
        raw.insert("id".to_string(), "42".to_string());
        let parsed = parse_query_obj(&raw);
        assert!(!parsed.contains_key("empty"));
        assert_eq!(parsed["id"], text("42"));
    }

    #[test]
    fn test_encode_plus_and_space() {
        assert_eq!(encode_query_value("a+b c"), "a%2Bb%20c");
    }

    #[test]
    fn test_encode_key_escapes_equals() {
        assert_eq!(encode_query_key("a=b"), "a%3Db");
        assert_eq!(encode_query_value("a=b"), "a=b");
    }

    #[test]
    fn test_decode_invalid_sequences_kept() {
        assert_eq!(&*decode("%ZZ"), "%ZZ");
        assert_eq!(&*decode("%2"), "%2");
    }
}
