use rand::{distributions::Alphanumeric, thread_rng, Rng};

/// Returns an alphanumeric string of the given length, suitable as an opaque token.
pub fn random_string(length: usize) -> String {
    let mut rng = thread_rng();

    std::iter::repeat(())
        .map(|_| rng.sample(Alphanumeric) as char)
        .take(length)
        .collect()
}
