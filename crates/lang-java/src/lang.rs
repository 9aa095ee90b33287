//! Java language facts needed without a compiler.

/// Types visible in every compilation unit through the implicit `java.lang.*` import.
pub const JAVA_LANG_TYPES: &[&str] = &[
    "AbstractMethodError",
    "Appendable",
    "ArithmeticException",
    "ArrayIndexOutOfBoundsException",
    "ArrayStoreException",
    "AssertionError",
    "AutoCloseable",
    "Boolean",
    "Byte",
    "CharSequence",
    "Character",
    "Class",
    "ClassCastException",
    "ClassLoader",
    "ClassNotFoundException",
    "CloneNotSupportedException",
    "Cloneable",
    "Comparable",
    "Deprecated",
    "Double",
    "Enum",
    "Error",
    "Exception",
    "ExceptionInInitializerError",
    "Float",
    "FunctionalInterface",
    "IllegalAccessException",
    "IllegalArgumentException",
    "IllegalMonitorStateException",
    "IllegalStateException",
    "IndexOutOfBoundsException",
    "InheritableThreadLocal",
    "InstantiationException",
    "Integer",
    "InternalError",
    "InterruptedException",
    "Iterable",
    "LinkageError",
    "Long",
    "Math",
    "NegativeArraySizeException",
    "NoSuchFieldException",
    "NoSuchMethodException",
    "NullPointerException",
    "Number",
    "NumberFormatException",
    "Object",
    "OutOfMemoryError",
    "Override",
    "Process",
    "ProcessBuilder",
    "Readable",
    "Record",
    "ReflectiveOperationException",
    "Runnable",
    "Runtime",
    "RuntimeException",
    "SafeVarargs",
    "SecurityException",
    "Short",
    "StackOverflowError",
    "StackTraceElement",
    "StrictMath",
    "String",
    "StringBuffer",
    "StringBuilder",
    "StringIndexOutOfBoundsException",
    "SuppressWarnings",
    "System",
    "Thread",
    "ThreadLocal",
    "Throwable",
    "TypeNotPresentException",
    "UnsupportedOperationException",
    "VirtualMachineError",
    "Void",
];

/// Methods every type inherits from `java.lang.Object`.
pub const OBJECT_METHODS: &[&str] = &[
    "clone",
    "equals",
    "finalize",
    "getClass",
    "hashCode",
    "notify",
    "notifyAll",
    "toString",
    "wait",
];

pub fn is_primitive(type_name: &str) -> bool {
    matches!(
        type_name,
        "byte" | "short" | "int" | "long" | "float" | "double" | "boolean" | "char" | "void"
    )
}

pub fn is_java_lang(simple_name: &str) -> bool {
    JAVA_LANG_TYPES.binary_search(&simple_name).is_ok()
}

/// `Map<K, List<V>>[]` -> `Map`; `java.util.List<T>` -> `java.util.List`.
pub fn strip_generics(type_text: &str) -> String {
    let mut out = String::with_capacity(type_text.len());
    let mut depth = 0usize;
    for c in type_text.chars() {
        match c {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            _ if depth > 0 || c.is_whitespace() || c == '[' || c == ']' => {}
            _ => out.push(c),
        }
    }
    out.trim_end_matches("...").trim_matches('.').to_string()
}

pub fn is_array_type(type_text: &str) -> bool {
    let trimmed = type_text.trim_end();
    trimmed.ends_with(']') || trimmed.ends_with("...")
}

/// Splits `pkg.sub.Outer.Inner` into `("pkg.sub", "Outer.Inner")` using the
/// convention that packages are lower case and types start upper case.
pub fn split_package(qualified: &str) -> (Option<String>, String) {
    let segments: Vec<&str> = qualified.split('.').collect();
    match segments
        .iter()
        .position(|s| s.chars().next().is_some_and(char::is_uppercase))
    {
        Some(0) | None => (None, qualified.to_string()),
        Some(i) => (Some(segments[..i].join(".")), segments[i..].join(".")),
    }
}

/// Default value returned by a stubbed method with the given return type.
pub fn default_value(type_text: &str) -> Option<&'static str> {
    match type_text.trim() {
        "void" => None,
        "boolean" => Some("false"),
        "char" => Some("'\\0'"),
        "byte" | "short" | "int" | "long" | "float" | "double" => Some("0"),
        _ => Some("null"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn java_lang_table_is_sorted() {
        let mut sorted = JAVA_LANG_TYPES.to_vec();
        sorted.sort_unstable();
        assert_eq!(sorted, JAVA_LANG_TYPES);
        assert!(is_java_lang("String"));
        assert!(!is_java_lang("List"));
    }

    #[test]
    fn strips_generic_arguments_and_arrays() {
        assert_eq!(strip_generics("Map<String, List<Integer>>"), "Map");
        assert_eq!(strip_generics("java.util.List<T>"), "java.util.List");
        assert_eq!(strip_generics("Order[]"), "Order");
        assert_eq!(strip_generics("String..."), "String");
        assert_eq!(strip_generics("Map.Entry<K, V>"), "Map.Entry");
        assert!(is_array_type("int[]"));
        assert!(!is_array_type("List<int[]>"));
    }

    #[test]
    fn splits_packages_from_types() {
        assert_eq!(
            split_package("java.util.Map.Entry"),
            (Some("java.util".to_string()), "Map.Entry".to_string())
        );
        assert_eq!(split_package("Order"), (None, "Order".to_string()));
        assert_eq!(split_package("com.shop.lower"), (None, "com.shop.lower".to_string()));
    }

    #[test]
    fn default_values_by_type() {
        assert_eq!(default_value("void"), None);
        assert_eq!(default_value("int"), Some("0"));
        assert_eq!(default_value("boolean"), Some("false"));
        assert_eq!(default_value("List<String>"), Some("null"));
    }
}
