/// Name of the enclosing test function, used to name its database.
///
/// Usage: `let app = spawn_app(test_name!()).await;`
macro_rules! test_name {
    () => {{
        fn marker() {}
        fn type_name_of<T>(_: T) -> &'static str {
            std::any::type_name::<T>()
        }
        type_name_of(marker)
            .trim_end_matches("::marker")
            .split("::")
            .filter(|segment| *segment != "{{closure}}")
            .last()
            .unwrap_or("unnamed")
            .to_string()
    }};
}
