#[cfg(target_os = "windows")]
mod windows_main;

fn main() {
    #[cfg(target_os = "windows")]
    windows_main::run();

    #[cfg(not(target_os = "windows"))]
    {
        eprintln!("Corolla only runs on Windows (it is built on Win32 low-level hooks).");
        std::process::exit(1);
    }
}
