fn main() {
    if std::env::var("CARGO_CFG_TARGET_OS").unwrap_or_default() == "windows" {
        let mut res = winres::WindowsResource::new();
        res.set("ProductName", "Course Timeline");
        res.set("FileDescription", "Course sign-in/sign-out timeline");
        res.compile().expect("Failed to compile Windows resources");
    }
}
