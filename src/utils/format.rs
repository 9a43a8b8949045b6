/// Format an external pool id for display (shortened)
pub fn short_id(pool_id: &str) -> String {
    let len = pool_id.len();
    if len <= 12 {
        return pool_id.to_string();
    }
    format!("{}...{}", &pool_id[0..4], &pool_id[len - 4..len])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_ids_are_shortened() {
        assert_eq!(
            short_id("747c1d2a-c668-4682-b9f9-296708a3dd90"),
            "747c...dd90"
        );
    }

    #[test]
    fn short_ids_pass_through() {
        assert_eq!(short_id("pool-1"), "pool-1");
    }
}
