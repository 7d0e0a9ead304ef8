use super::vec::Race;
use super::{Options, Race as RaceTrait};
use crate::racer::Racer;

impl<R: Racer, const N: usize> RaceTrait for [R; N] {
    type Output = R::Value;
    type Future = Race<R>;

    fn race_with(self, options: Options) -> Self::Future {
        Race::new(Vec::from(self), options)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::racer::from_fn;
    use crate::RaceError;
    use std::time::Duration;

    #[tokio::test]
    async fn first_success_wins() {
        let res = [
            from_fn(|_| async {
                tokio::time::sleep(Duration::from_millis(30)).await;
                Ok::<_, ()>("late")
            }),
            from_fn(|_| async { Ok::<_, ()>("early") }),
        ]
        .race()
        .await;
        assert_eq!(res, Ok("early"));
    }

    #[tokio::test]
    async fn empty_array() {
        let racers: [crate::BoxRacer<(), ()>; 0] = [];
        let res = racers.race().await;
        assert_eq!(res, Err(RaceError::NoRacers));
    }
}
