fn main() {
    #[cfg(target_os = "windows")]
    {
        winres::WindowsResource::new()
            .set_icon("assets/logo.ico")
            .compile()
            .expect("Failed to compile Windows resources");
    }
}
