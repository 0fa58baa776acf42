fn main() -> std::process::ExitCode {
    hpgl_sender_lib::run()
}
