use cfg_aliases::cfg_aliases;

fn main() {
    cfg_aliases! {
        // Brick-style and Pi-style robot controllers. These default to the
        // smaller permutation budget.
        embedded: {
            any(
                target_arch = "arm",
                all(
                    target_arch = "aarch64",
                    target_os = "linux",
                    target_env = "gnu"
                )
            )
        }
    }
}
