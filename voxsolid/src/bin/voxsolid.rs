fn main() {
    std::process::exit(
        match voxsolid::cli::run_voxsolid(std::env::args_os().collect::<Vec<_>>().as_slice()) {
            Ok(_) => 0,
            Err(_) => 1,
        },
    );
}
