//! Odd-job table for the hourly work claim.
//!
//! A job is picked by weight, then pays a uniform amount in its `[min, max]` range.
//! Rare jobs pay the most.

use rand::Rng;

use super::GameRng;
use crate::weighted::pick_weighted;

#[derive(Clone, Copy, Debug)]
pub struct Job {
    pub title: &'static str,
    pub min: u64,
    pub max: u64,
}

const fn job(title: &'static str, min: u64, max: u64) -> Job {
    Job { title, min, max }
}

/// (job, pick weight).
pub const JOBS: [(Job, u64); 49] = [
    (job("Flipping burgers 🍔", 10, 50), 40),
    (job("Hacking the Pentagon 💻", 500, 1000), 2),
    (job("Walking dogs 🐕", 20, 100), 25),
    (job("Being a clown 🤡", 5, 30), 15),
    (job("Rocket scientist 🚀", 200, 500), 5),
    (job("Selling lemonade 🍋", 10, 50), 30),
    (job("Mining Bitcoin 🪙", 100, 300), 10),
    (job("Comedy club performance 🎤", 50, 150), 15),
    (job("Fortune teller 🔮", 20, 80), 20),
    (job("Pizza delivery 🍕", 30, 70), 30),
    (job("Street musician 🎸", 15, 60), 25),
    (job("Fishing 🎣", 40, 120), 20),
    (job("Lawn mowing 🌱", 25, 90), 30),
    (job("Garbage collector 🗑️", 30, 100), 25),
    (job("Freelance artist 🎨", 40, 150), 15),
    (job("Online tutor 📚", 50, 200), 10),
    (job("Riding a unicorn 🦄", 5, 10), 2),
    (job("Alien research assistant 👽", 300, 800), 3),
    (job("Gold miner ⛏️", 100, 300), 10),
    (job("Treasure hunter 🏴‍☠️", 200, 1000), 5),
    (job("Farmhand 🌾", 30, 120), 25),
    (job("Astronaut 🧑‍🚀", 500, 1500), 1),
    (job("Game tester 🎮", 40, 100), 20),
    (job("Retail cashier 🛒", 20, 80), 30),
    (job("Chef 👨‍🍳", 100, 400), 10),
    (job("Stand-up comedian 🎤", 50, 200), 15),
    (job("Building Lego sets 🧱", 20, 60), 30),
    (job("Private detective 🕵️", 150, 400), 5),
    (job("Zoo cleaner 🦍", 30, 70), 30),
    (job("Taxi driver 🚕", 50, 150), 20),
    (job("Hotdog vendor 🌭", 25, 90), 25),
    (job("YouTuber 🎥", 50, 300), 10),
    (job("Photographer 📸", 40, 200), 15),
    (job("Auctioneer 🛎️", 200, 800), 5),
    (job("Toy tester 🧸", 20, 70), 25),
    (job("Santa Claus 🎅", 50, 200), 10),
    (job("Repairing robots 🤖", 150, 500), 8),
    (job("Shoveling snow ❄️", 30, 100), 25),
    (job("Alien diplomat 👾", 500, 2000), 1),
    (job("Luxury yacht captain 🛥️", 300, 1000), 3),
    (job("Writing novels 📖", 100, 400), 10),
    (job("Treasure diver 🤿", 200, 600), 5),
    (job("Extreme sports instructor 🪂", 150, 400), 10),
    (job("Painting fences 🎨", 20, 80), 30),
    (job("Babysitting 👶", 30, 100), 20),
    (job("Spy on a mission 🕶️", 300, 800), 4),
    (job("Sculptor 🗿", 50, 250), 12),
    (job("Juggling 🔴", 10, 50), 25),
    (job("Pilot ✈️", 500, 1200), 3),
];

/// One worked shift.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Shift {
    pub job: &'static str,
    pub earnings: u64,
}

pub fn pick_shift(rng: &mut GameRng) -> Shift {
    let job = pick_weighted(&JOBS, rng).unwrap_or(&JOBS[0].0);
    let earnings = rng.gen_range(job.min..=job.max);
    Shift {
        job: job.title,
        earnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_table_is_well_formed() {
        let mut titles = HashSet::new();
        for (job, weight) in &JOBS {
            assert!(*weight > 0, "{}", job.title);
            assert!(job.min <= job.max, "{}", job.title);
            assert!(titles.insert(job.title), "duplicate job {}", job.title);
        }
    }

    #[test]
    fn test_earnings_land_in_the_job_range() {
        for stream in 0..300 {
            let mut rng = GameRng::new(&[11u8; 32], stream, 0);
            let shift = pick_shift(&mut rng);
            let (job, _) = JOBS
                .iter()
                .find(|(job, _)| job.title == shift.job)
                .expect("shift names a job from the table");
            assert!(shift.earnings >= job.min && shift.earnings <= job.max);
        }
    }

    #[test]
    fn test_common_jobs_outnumber_rare_ones() {
        let mut burgers = 0u32;
        let mut astronauts = 0u32;
        for stream in 0..2_000 {
            let mut rng = GameRng::new(&[11u8; 32], stream, 0);
            match pick_shift(&mut rng).job {
                "Flipping burgers 🍔" => burgers += 1,
                "Astronaut 🧑‍🚀" => astronauts += 1,
                _ => {}
            }
        }
        assert!(burgers > astronauts);
    }
}
