/// World styles for the Mirage model, `(display key, instruction)`.
pub const MIRAGE_PROMPTS: &[(&str, &str)] = &[
    ("Frozen", "Frozen World"),
    ("Versailles Palace", "Versailles Palace World"),
    ("Minecraft", "Minecraft World"),
    ("Lego", "Lego World"),
    ("California", "California World"),
    ("Magical Fantasy", "Magical Fantasy World"),
    ("Barbie", "Barbie World"),
    ("Cyberpunk", "Cyberpunk World"),
    ("Yarn", "Yarn World"),
    ("Ultra Realistic", "Ultra Realistic World"),
    ("Christmas", "Christmas World"),
    ("Claymation", "Claymation World"),
    ("Luxury", "Luxury World"),
    ("Glass", "Glass World"),
    ("Future Underground", "Future Underground World"),
    ("Colored Manga", "Colored Manga World"),
    ("Purple Nightlife", "Purple Nightlife World"),
    ("Fairy Lights", "Fairy Lights World"),
    ("Home Study", "Home Study World"),
    ("Space Pyramid", "Space Pyramid World"),
    ("Dollhouse", "Dollhouse World"),
    ("Office", "Office World"),
    ("Comic Book", "Comic Book World"),
    ("Purple Palace", "Purple Palace World"),
    ("Japan", "Japan World"),
    ("Spaceship", "Spaceship World"),
    ("Avatar", "Avatar World"),
    ("Zombie", "Zombie World"),
    ("Golden Dawn", "Golden Dawn World"),
    ("Wood", "Wood World"),
    ("Play-Doh", "Play-Doh World"),
    ("Wizards", "Wizards World"),
    ("Relaxing Anime", "Relaxing Anime World"),
    ("Hell", "Hell World"),
    ("Heaven", "Heaven World"),
    ("Hospital", "Hospital World"),
    ("Muted 2D", "Muted 2D World"),
    ("China", "China World"),
    ("Medieval", "Medieval World"),
    ("Beach", "Beach World"),
    ("Anime Log-Cabin", "Anime Log-Cabin World"),
    ("Jungle War", "Jungle War World"),
    ("Vikings", "Vikings World"),
    ("Run Down Office", "Run Down Office World"),
    ("Snowfall", "Snowfall World"),
    ("Anime", "Anime World"),
    ("Semi-Realistic", "Semi-Realistic World"),
    ("Sakura", "Sakura World"),
    ("Cigar Lounge", "Cigar Lounge World"),
    ("Forest", "Forest World"),
    ("Moon", "Moon World"),
    ("Diwali", "Diwali World"),
    ("Manga", "Manga World"),
    ("Galactic Wars", "Galactic Wars World"),
    ("Tropical Paradise", "Tropical Paradise World"),
    ("Portal", "Portal World"),
    ("Music Festival", "Music Festival World"),
    ("Egyptian Pyramids", "Egyptian Pyramids World"),
    ("S'mores", "S'mores World"),
    ("K-POP", "K-POP World"),
    ("Dubai Skyline", "Dubai Skyline World"),
];

/// Edit instructions for the Lucy model, `(display key, instruction)`.
pub const LUCY_PROMPTS: &[(&str, &str)] = &[
    ("Anime Character", "Turn the person into an anime character"),
    ("Superhero", "Dress the person in a red and gold superhero suit"),
    ("Astronaut", "Put the person in a white astronaut suit"),
    ("Knight", "Change the outfit to shining medieval knight armor"),
    ("Wizard", "Dress the person in a long purple wizard robe covered in stars"),
    ("Zombie", "Turn the person into a zombie with pale green skin"),
    ("Cyborg", "Replace the skin with chrome cyborg plating and glowing blue lines"),
    ("Pirate", "Dress the person as a pirate captain with a tricorn hat"),
    ("Elf", "Give the person pointed elf ears and elegant forest clothing"),
    ("Tuxedo", "Change the outfit to a black tuxedo with a bow tie"),
    ("Samurai", "Dress the person in traditional samurai armor"),
    ("Old Age", "Make the person look eighty years old"),
    ("Oil Painting", "Render the person as a classical oil painting portrait"),
    ("Golden Statue", "Turn the person into a polished golden statue"),
    ("Clown", "Give the person colorful clown makeup and a rainbow wig"),
];
