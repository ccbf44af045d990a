//! The closed, curated, ordered set of forbidden patterns.
//!
//! Each entry is `(regex source, reason)`. Matching is always
//! case-insensitive — callers build these with `regex::RegexBuilder`'s
//! `case_insensitive(true)` rather than relying on inline `(?i)` so the flag
//! can't be lost by a future edit to one pattern.

pub const FORBIDDEN_PATTERNS: &[(&str, &str)] = &[
    // Direct code evaluation
    (r"\beval\s*\(", "eval() code execution"),
    (r"\bassert\s*\(", "assert() code execution"),
    (r"\bcreate_function\s*\(", "create_function() code execution"),
    // Shell / process execution
    (r"\bshell_exec\s*\(", "shell command execution"),
    (r"\bexec\s*\(", "process execution"),
    (r"\bpassthru\s*\(", "process execution"),
    (r"\bsystem\s*\(", "process execution"),
    (r"\bpopen\s*\(", "process execution"),
    (r"\bproc_open\s*\(", "process execution"),
    (r"\bproc_close\s*\(", "process execution"),
    (r"`[^`]*`", "backtick shell execution"),
    // File-system I/O
    (r"\bfopen\s*\(", "file-system write/read access"),
    (r"\bfwrite\s*\(", "file-system write access"),
    (r"\bfile_put_contents\s*\(", "file-system write access"),
    (r"\bfile_get_contents\s*\(", "file-system read access"),
    (r"\bunlink\s*\(", "file-system delete access"),
    (r"\brmdir\s*\(", "file-system delete access"),
    (r"\bmkdir\s*\(", "file-system write access"),
    (r"\bchmod\s*\(", "file-system permission access"),
    (r"\brename\s*\(", "file-system write access"),
    (r"\bcopy\s*\(", "file-system write access"),
    // Dynamic inclusion
    (r"\binclude\s*(_once)?\s*\(", "dynamic file inclusion"),
    (r"\brequire\s*(_once)?\s*\(", "dynamic file inclusion"),
    // Dynamic / indirect function invocation
    (r"\bcall_user_func\s*\(", "indirect function invocation"),
    (r"\bcall_user_func_array\s*\(", "indirect function invocation"),
    (r"\bforward_static_call\s*\(", "indirect function invocation"),
    (r"\$\$\w", "indirect variable reference"),
    (r"\$\{", "indirect variable reference"),
    // Stream wrappers
    (r"\bphp://", "PHP stream wrapper"),
    (r"\bdata://", "data stream wrapper"),
    (r"\bphar://", "phar stream wrapper"),
    (r"\bexpect://", "expect stream wrapper"),
    (r"\bzip://", "zip stream wrapper"),
    (r"\bcompress\.zlib://", "zlib stream wrapper"),
    // Null-byte injection
    (r"\\x00", "literal null-byte injection"),
    (r"\\0(?:[0-7]{2})?", "escaped-octal null-byte injection"),
    (r"%00", "URL-encoded null-byte injection"),
    // Output-buffer interception
    (r"\bob_start\s*\(", "output buffer interception"),
    (r"\bob_get_clean\s*\(", "output buffer interception"),
    (r"\bob_get_contents\s*\(", "output buffer interception"),
    (r"\bob_end_clean\s*\(", "output buffer interception"),
    // Serialization / deserialization
    (r"\bunserialize\s*\(", "unsafe deserialization"),
    (r"\bserialize\s*\(", "serialization"),
    // Process control and POSIX
    (r"\bpcntl_\w+\s*\(", "process control"),
    (r"\bposix_\w+\s*\(", "POSIX system access"),
    // Sockets and cURL
    (r"\bfsockopen\s*\(", "raw socket access"),
    (r"\bsocket_\w+\s*\(", "raw socket access"),
    (r"\bcurl_init\s*\(", "outbound HTTP request"),
    (r"\bcurl_exec\s*\(", "outbound HTTP request"),
    // Direct database drivers
    (r"\bmysqli?_query\s*\(", "direct database access"),
    (r"\bpg_query\s*\(", "direct database access"),
    (r"\bsqlite_query\s*\(", "direct database access"),
    (r"\bPDO::", "direct database access"),
    // Regex-replace with code-evaluation modifier
    (r"\bpreg_replace\s*\([^)]*/e", "preg_replace() eval modifier"),
    // Mail
    (r"\bmail\s*\(", "outbound mail dispatch"),
    // HTTP header / cookie manipulation
    (r"\bheader\s*\(", "HTTP header manipulation"),
    (r"\bsetcookie\s*\(", "cookie manipulation"),
    (r"\bsetrawcookie\s*\(", "cookie manipulation"),
    // Session manipulation
    (r"\bsession_start\s*\(", "session manipulation"),
    (r"\bsession_destroy\s*\(", "session manipulation"),
    (r"\bsession_regenerate_id\s*\(", "session manipulation"),
    // Superglobal-like containers
    (r"\$_GET\b", "request-superglobal access"),
    (r"\$_POST\b", "request-superglobal access"),
    (r"\$_REQUEST\b", "request-superglobal access"),
    (r"\$_COOKIE\b", "cookie-superglobal access"),
    (r"\$_SESSION\b", "session-superglobal access"),
    (r"\$_SERVER\b", "server-superglobal access"),
    (r"\$_ENV\b", "environment-superglobal access"),
    (r"\bputenv\s*\(", "environment mutation"),
    // Script-termination primitives
    (r"\bexit\s*\(", "script termination"),
    (r"\bdie\s*\(", "script termination"),
    // Information disclosure
    (r"\bphpinfo\s*\(", "information disclosure"),
    (r"\bphpversion\s*\(", "information disclosure"),
    (r"\bini_get\s*\(", "information disclosure"),
    (r"\bini_set\s*\(", "information disclosure"),
    (r"\bget_defined_vars\s*\(", "information disclosure"),
    (r"\bget_defined_functions\s*\(", "information disclosure"),
    (r"\bget_declared_classes\s*\(", "information disclosure"),
    // Introspection predicates
    (r"\bfunction_exists\s*\(", "introspection probe"),
    (r"\bmethod_exists\s*\(", "introspection probe"),
    (r"\bclass_exists\s*\(", "introspection probe"),
    (r"\bis_callable\s*\(", "introspection probe"),
    (r"\bproperty_exists\s*\(", "introspection probe"),
    // Variable-table mutation
    (r"\bextract\s*\(", "variable-table mutation"),
    (r"\bcompact\s*\(", "variable-table mutation"),
    (r"\bparse_str\s*\(", "variable-table mutation"),
    // Callback-accepting array primitives
    (r"\barray_map\s*\(", "callback-accepting array primitive"),
    (r"\barray_filter\s*\(", "callback-accepting array primitive"),
    (r"\barray_reduce\s*\(", "callback-accepting array primitive"),
    (r"\barray_walk\w*\s*\(", "callback-accepting array primitive"),
    (r"\busort\s*\(", "callback-accepting array primitive"),
    (r"\buasort\s*\(", "callback-accepting array primitive"),
    (r"\buksort\s*\(", "callback-accepting array primitive"),
    (
        r"\bpreg_replace_callback\s*\(",
        "callback-accepting array primitive",
    ),
    // Reflection
    (r"\bReflection\w*\b", "reflection API access"),
    // Object instantiation / static calls / exceptions / constants
    (r"\bnew\s+\w+", "object instantiation"),
    (r"\w+::\w+\s*\(", "static method call"),
    (r"\bnew\s+\w*Exception\b", "exception construction"),
    (r"\bdefine\s*\(", "constant definition"),
    (r"\bconst\s+\w+\s*=", "constant definition"),
    // Anonymous / arrow function literals
    (r"\bfunction\s*\(", "anonymous function literal"),
    (r"\bfn\s*\(.*\)\s*=>", "arrow function literal"),
];
