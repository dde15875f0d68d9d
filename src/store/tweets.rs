use uuid::Uuid;

use super::{decode, encode, get, modify, Error, Result, Store};
use crate::models::Tweet;

impl Store {
    pub fn create_tweet(&self, text: String, author: Uuid, parent: Option<Uuid>) -> Result<Tweet> {
        if text.is_empty() {
            return Err(Error::InvalidDocument("tweet text is required"));
        }
        self.insert_tweet(Tweet::new(text, author, parent))
    }

    pub fn get_tweet(&self, id: &Uuid) -> Result<Tweet> {
        get(&self.tweets, id)?.ok_or(Error::NotFound)
    }

    /// Replaces the text of a tweet. Every other field is left as is.
    pub fn update_tweet(&self, id: &Uuid, text: String) -> Result<Tweet> {
        modify(&self.tweets, id, |tweet: &mut Tweet| tweet.text = text.clone())
    }

    /// Deletes a tweet and returns what it was. Replies are not touched.
    pub fn remove_tweet(&self, id: &Uuid) -> Result<Tweet> {
        let removed = self.tweets.remove(id.as_bytes())?.ok_or(Error::NotFound)?;
        decode(&removed)
    }

    pub fn toggle_like(&self, id: &Uuid, user_id: Uuid) -> Result<Tweet> {
        modify(&self.tweets, id, |tweet: &mut Tweet| tweet.toggle_like(user_id))
    }

    pub fn retweet(&self, id: &Uuid, author: Uuid) -> Result<Tweet> {
        let source = self.get_tweet(id)?;
        self.insert_tweet(source.retweet(author))
    }

    /// The tweet at `id` followed by its direct replies, oldest first.
    /// Replies to replies are not included.
    pub fn thread(&self, id: &Uuid) -> Result<Vec<Tweet>> {
        let root = self.get_tweet(id)?;

        let mut thread = self
            .tweets
            .iter()
            .values()
            .map(|value| decode::<Tweet>(&value?))
            .filter(|tweet| match tweet {
                Ok(tweet) => tweet.in_thread_of(&root.id),
                Err(_) => true,
            })
            .collect::<Result<Vec<Tweet>>>()?;
        thread.sort_by(|a, b| a.created_at.cmp(&b.created_at));

        Ok(thread)
    }

    fn insert_tweet(&self, tweet: Tweet) -> Result<Tweet> {
        self.tweets.insert(tweet.id.as_bytes(), encode(&tweet)?)?;
        Ok(tweet)
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use crate::store::{temporary, Error};

    #[test]
    fn created_tweet_can_be_read_back() {
        let store = temporary();
        let author = Uuid::new_v4();
        let created = store.create_tweet("hello".into(), author, None).unwrap();

        let fetched = store.get_tweet(&created.id).unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.text, "hello");
        assert_eq!(fetched.author, author);
        assert!(fetched.likes.is_empty());
        assert_eq!(fetched.parent, None);
    }

    #[test]
    fn tweet_without_text_is_rejected() {
        let store = temporary();
        let result = store.create_tweet(String::new(), Uuid::new_v4(), None);
        assert!(matches!(result, Err(Error::InvalidDocument(_))));

        // only the empty string counts as missing
        let blank = store.create_tweet("   ".into(), Uuid::new_v4(), None).unwrap();
        assert_eq!(store.get_tweet(&blank.id).unwrap().text, "   ");
    }

    #[test]
    fn update_only_changes_text() {
        let store = temporary();
        let created = store.create_tweet("hello".into(), Uuid::new_v4(), None).unwrap();
        let liked = store.toggle_like(&created.id, Uuid::new_v4()).unwrap();

        let updated = store.update_tweet(&created.id, "edited".into()).unwrap();
        assert_eq!(updated.text, "edited");
        assert_eq!(updated.author, created.author);
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(updated.likes, liked.likes);
        assert_eq!(store.get_tweet(&created.id).unwrap(), updated);
    }

    #[test]
    fn toggle_like_twice_is_identity() {
        let store = temporary();
        let created = store.create_tweet("hello".into(), Uuid::new_v4(), None).unwrap();
        let user = Uuid::new_v4();

        let liked = store.toggle_like(&created.id, user).unwrap();
        assert_eq!(liked.likes, vec![user]);

        let unliked = store.toggle_like(&created.id, user).unwrap();
        assert_eq!(unliked.likes, created.likes);
    }

    #[test]
    fn concurrent_likes_are_all_kept() {
        let store = temporary();
        let created = store.create_tweet("hello".into(), Uuid::new_v4(), None).unwrap();
        let users = (0..32).map(|_| Uuid::new_v4()).collect::<Vec<_>>();

        std::thread::scope(|scope| {
            for user in &users {
                let store = store.clone();
                scope.spawn(move || store.toggle_like(&created.id, *user).unwrap());
            }
        });

        let likes = store.get_tweet(&created.id).unwrap().likes;
        assert_eq!(likes.len(), users.len());
        assert!(users.iter().all(|user| likes.contains(user)));
    }

    #[test]
    fn concurrent_even_toggles_cancel_out() {
        let store = temporary();
        let created = store.create_tweet("hello".into(), Uuid::new_v4(), None).unwrap();
        let other = Uuid::new_v4();
        let before = store.toggle_like(&created.id, other).unwrap().likes;
        let user = Uuid::new_v4();

        std::thread::scope(|scope| {
            for _ in 0..32 {
                let store = store.clone();
                scope.spawn(move || store.toggle_like(&created.id, user).unwrap());
            }
        });

        assert_eq!(store.get_tweet(&created.id).unwrap().likes, before);
    }

    #[test]
    fn retweet_copies_text_only() {
        let store = temporary();
        let source = store.create_tweet("original".into(), Uuid::new_v4(), None).unwrap();
        store.toggle_like(&source.id, Uuid::new_v4()).unwrap();

        let author = Uuid::new_v4();
        let retweet = store.retweet(&source.id, author).unwrap();
        assert_eq!(retweet.parent, Some(source.id));
        assert_eq!(retweet.author, author);
        assert_eq!(retweet.text, "original");
        assert!(retweet.likes.is_empty());
        assert_eq!(store.get_tweet(&retweet.id).unwrap(), retweet);
    }

    #[test]
    fn thread_is_root_and_direct_children_in_order() {
        let store = temporary();
        let author = Uuid::new_v4();
        let root = store.create_tweet("root".into(), author, None).unwrap();
        let child = store.create_tweet("child".into(), author, Some(root.id)).unwrap();
        let second = store.retweet(&root.id, Uuid::new_v4()).unwrap();
        store.create_tweet("grandchild".into(), author, Some(child.id)).unwrap();
        store.create_tweet("unrelated".into(), author, None).unwrap();

        let thread = store.thread(&root.id).unwrap();
        assert_eq!(thread, vec![root, child.clone(), second]);

        let sub = store.thread(&child.id).unwrap();
        assert_eq!(sub.len(), 2);
        assert_eq!(sub[0], child);
        assert_eq!(sub[1].text, "grandchild");
    }

    #[test]
    fn removed_tweet_is_gone() {
        let store = temporary();
        let created = store.create_tweet("bye".into(), Uuid::new_v4(), None).unwrap();

        assert_eq!(store.remove_tweet(&created.id).unwrap(), created);
        assert!(matches!(store.get_tweet(&created.id), Err(Error::NotFound)));
        assert!(matches!(store.update_tweet(&created.id, "x".into()), Err(Error::NotFound)));
        assert!(matches!(store.remove_tweet(&created.id), Err(Error::NotFound)));
        assert!(matches!(store.toggle_like(&created.id, Uuid::new_v4()), Err(Error::NotFound)));
        assert!(matches!(store.retweet(&created.id, Uuid::new_v4()), Err(Error::NotFound)));
        assert!(matches!(store.thread(&created.id), Err(Error::NotFound)));
    }

    #[test]
    fn deleting_parent_keeps_children() {
        let store = temporary();
        let root = store.create_tweet("root".into(), Uuid::new_v4(), None).unwrap();
        let child = store.retweet(&root.id, Uuid::new_v4()).unwrap();

        store.remove_tweet(&root.id).unwrap();
        assert_eq!(store.get_tweet(&child.id).unwrap().parent, Some(root.id));
    }
}
