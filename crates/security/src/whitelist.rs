//! The closed built-in function whitelist.
//!
//! Every entry is a side-effect-free string/number/array *accessor* safe to
//! appear in an interpolated expression. Entries are lowercase; matching is
//! always case-insensitive.

pub const BUILTIN_WHITELIST: &[&str] = &[
    // HTML / output escaping
    "htmlspecialchars",
    "htmlspecialchars_decode",
    "htmlentities",
    "html_entity_decode",
    "strip_tags",
    "nl2br",
    "wordwrap",
    // String inspection and transformation
    "strlen",
    "mb_strlen",
    "strtolower",
    "strtoupper",
    "mb_strtolower",
    "mb_strtoupper",
    "ucfirst",
    "ucwords",
    "lcfirst",
    "trim",
    "ltrim",
    "rtrim",
    "str_pad",
    "str_repeat",
    "str_replace",
    "str_ireplace",
    "substr",
    "mb_substr",
    "substr_count",
    "strpos",
    "stripos",
    "strrpos",
    "str_contains",
    "str_starts_with",
    "str_ends_with",
    "sprintf",
    "vsprintf",
    "number_format",
    "implode",
    "explode",
    "join",
    "str_split",
    "addslashes",
    "stripslashes",
    "rawurlencode",
    "urlencode",
    "rawurldecode",
    "urldecode",
    "strrev",
    "str_word_count",
    "levenshtein",
    "similar_text",
    "soundex",
    "metaphone",
    "chunk_split",
    "nl_langinfo",
    "preg_match",
    "preg_quote",
    "preg_split",
    // Type and container predicates
    "is_array",
    "is_string",
    "is_numeric",
    "is_int",
    "is_integer",
    "is_float",
    "is_bool",
    "is_null",
    "is_object",
    "gettype",
    "settype",
    "count",
    "sizeof",
    "in_array",
    "array_key_exists",
    "array_keys",
    "array_values",
    "array_merge",
    "array_slice",
    "array_reverse",
    "array_unique",
    "array_flip",
    "array_sum",
    "array_product",
    "array_diff",
    "array_intersect",
    "array_combine",
    "array_fill",
    "array_pad",
    "sort",
    "asort",
    "ksort",
    "rsort",
    "arsort",
    "krsort",
    // Numeric
    "abs",
    "ceil",
    "floor",
    "round",
    "intval",
    "floatval",
    "doubleval",
    "strval",
    "boolval",
    "min",
    "max",
    "pow",
    "sqrt",
    "fmod",
    "rand",
    "mt_rand",
    // Date / time formatting (read-only, no clock mutation)
    "date",
    "gmdate",
    "strtotime",
    "mktime",
    "time",
    "checkdate",
    // Misc read-only accessors used by forum templates
    "json_encode",
    "json_decode",
    "base64_encode",
    "base64_decode",
    "md5",
    "sha1",
    "crc32",
    "dechex",
    "hexdec",
    "decbin",
    "bindec",
];
