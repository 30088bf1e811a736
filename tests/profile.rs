mod tests {
    use lumen_fixture::{BrightnessStore, ChannelId, FixtureError, PROFILES, ProfileManager};

    #[test]
    fn test_load_writes_listed_channels() {
        let mut profiles = ProfileManager::new(PROFILES);
        let mut store = BrightnessStore::new();
        store.set_desired(ChannelId::Red, 42);

        profiles.load(&mut store, 0).unwrap();
        assert_eq!(store.desired(), [42, 100, 255]);
        assert_eq!(profiles.index(), 0);

        profiles.load(&mut store, 2).unwrap();
        assert_eq!(store.desired(), [42, 0, 100]);
        assert_eq!(profiles.index(), 2);
    }

    #[test]
    fn test_out_of_range_is_rejected() {
        let mut profiles = ProfileManager::default();
        let mut store = BrightnessStore::new();
        profiles.load(&mut store, 1).unwrap();

        assert_eq!(
            profiles.load(&mut store, 3),
            Err(FixtureError::InvalidIndex(3))
        );
        assert_eq!(profiles.index(), 1);
        assert_eq!(store.desired(), [0, 0, 255]);
    }

    #[test]
    fn test_next_index_wraps() {
        let mut profiles = ProfileManager::default();
        let mut store = BrightnessStore::new();
        assert_eq!(profiles.next_index(), 1);
        profiles.load(&mut store, 2).unwrap();
        assert_eq!(profiles.next_index(), 0);
    }

    #[test]
    fn test_empty_catalog() {
        let profiles = ProfileManager::new(&[]);
        assert!(profiles.is_empty());
        assert_eq!(profiles.next_index(), 0);
        assert!(profiles.get(0).is_none());
    }

    #[test]
    fn test_channel_ids() {
        assert_eq!(ChannelId::try_from(1u8), Ok(ChannelId::Blue));
        assert_eq!(ChannelId::try_from(3u8), Err(FixtureError::InvalidChannel));
        assert_eq!(ChannelId::parse_from_str("g"), Some(ChannelId::Green));
        assert_eq!(ChannelId::parse_from_str("x"), None);
        assert_eq!(ChannelId::Green.index(), 2);
    }
}
