use rocket::tokio::sync::watch;

/// 「リスト画面のデータが古くなった」ことを知らせるシグナル。
/// Next.js の `revalidatePath("/dashboard")` に相当し、変更系コマンドの成功ごとに世代番号が進みます。
pub struct StaleSignal {
    tx: watch::Sender<u64>,
}

impl StaleSignal {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(0);
        StaleSignal { tx }
    }

    pub fn mark_stale(&self) {
        self.tx.send_modify(|generation| *generation += 1);
    }

    /// 現在の世代番号
    pub fn generation(&self) -> u64 {
        *self.tx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.tx.subscribe()
    }
}

impl Default for StaleSignal {
    fn default() -> Self {
        Self::new()
    }
}
