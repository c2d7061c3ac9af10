use vergen::*;

fn main() {
    // Outside a git checkout there is no commit to describe; the
    // binary falls back to "unknown" in that case.
    let flags = ConstantsFlags::all();
    if let Err(e) = gen(flags) {
        println!("cargo:warning=unable to generate version information: {}", e);
    }
}
